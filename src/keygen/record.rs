//! Tagged license record
//!
//! A record is a run of `tag, [length], payload` chunks in fixed tag order,
//! closed by tag 255 and four checksum bytes. The checksum is the first four
//! bytes of the SHA-1 digest of the chunks, stored in reverse order.

use chrono::{Datelike, NaiveDate};
use sha1::{Digest, Sha1};

use crate::error::{FormatError, KeyError, KeyResult};
use crate::types::{tag, License, PRODUCT_CODE_LEN};

const MAX_FIELD_LEN: usize = 255;
const CHECKSUM_LEN: usize = 4;

/// Serialize a license and append the terminator and checksum.
pub fn pack_record(license: &License) -> KeyResult<Vec<u8>> {
    let mut out = Vec::with_capacity(64);

    if let Some(version) = license.version {
        out.extend_from_slice(&[tag::VERSION, version]);
    }
    if let Some(name) = non_empty(license.name.as_deref().map(str::as_bytes)) {
        put_sized(&mut out, tag::NAME, "name", name)?;
    }
    if let Some(email) = non_empty(license.email.as_deref().map(str::as_bytes)) {
        put_sized(&mut out, tag::EMAIL, "email", email)?;
    }
    if let Some(hwid) = non_empty(license.hardware_id.as_deref()) {
        if hwid.len() % 4 != 0 {
            return Err(FormatError::HardwareIdLength { len: hwid.len() }.into());
        }
        put_sized(&mut out, tag::HARDWARE_ID, "hardware id", hwid)?;
    }
    if let Some(date) = license.expiration {
        put_date(&mut out, tag::EXPIRATION, "expiration", date)?;
    }
    if let Some(limit) = license.running_time_limit {
        let limit = u8::try_from(limit)
            .map_err(|_| FormatError::RunningTimeLimit { value: limit })?;
        out.extend_from_slice(&[tag::RUNNING_TIME_LIMIT, limit]);
    }
    if let Some(code) = non_empty(license.product_code.as_deref()) {
        if code.len() != PRODUCT_CODE_LEN {
            return Err(FormatError::ProductCodeLength { len: code.len() }.into());
        }
        out.push(tag::PRODUCT_CODE);
        out.extend_from_slice(code);
    }
    if let Some(data) = non_empty(license.user_data.as_deref()) {
        put_sized(&mut out, tag::USER_DATA, "user data", data)?;
    }
    if let Some(date) = license.max_build {
        put_date(&mut out, tag::MAX_BUILD, "max build", date)?;
    }

    if out.is_empty() {
        return Err(FormatError::EmptyRecord.into());
    }

    let sum = checksum(&out);
    out.push(tag::END);
    out.extend_from_slice(&sum);
    Ok(out)
}

/// Parse a record from untrusted bytes and verify its checksum.
///
/// Anything after the checksum is padding and is ignored.
pub fn unpack_record(data: &[u8]) -> KeyResult<License> {
    let mut reader = Reader::new(data);
    let mut license = License::default();

    let end = loop {
        let offset = reader.pos;
        let Some(chunk) = reader.next_tag() else {
            return Err(FormatError::MissingTerminator.into());
        };

        match chunk {
            tag::VERSION => license.version = Some(reader.byte()?),
            tag::NAME => license.name = Some(reader.text("name")?),
            tag::EMAIL => license.email = Some(reader.text("email")?),
            tag::HARDWARE_ID => license.hardware_id = Some(reader.sized()?.to_vec()),
            tag::EXPIRATION => license.expiration = Some(reader.date("expiration")?),
            tag::RUNNING_TIME_LIMIT => {
                license.running_time_limit = Some(u32::from(reader.byte()?))
            }
            tag::PRODUCT_CODE => {
                license.product_code = Some(reader.take(PRODUCT_CODE_LEN)?.to_vec())
            }
            tag::USER_DATA => license.user_data = Some(reader.sized()?.to_vec()),
            tag::MAX_BUILD => license.max_build = Some(reader.date("max build")?),
            tag::END => break offset,
            other => return Err(FormatError::UnknownTag { tag: other, offset }.into()),
        }
    };

    let stored = data
        .get(end + 1..end + 1 + CHECKSUM_LEN)
        .ok_or(FormatError::MissingChecksum {
            available: data.len() - end - 1,
        })?;
    let expected = checksum(&data[..end]);
    if stored != &expected[..] {
        let mut found = [0u8; CHECKSUM_LEN];
        found.copy_from_slice(stored);
        return Err(KeyError::Integrity { expected, found });
    }

    tracing::trace!(fields_len = end, "record checksum verified");
    Ok(license)
}

fn checksum(fields: &[u8]) -> [u8; CHECKSUM_LEN] {
    let digest = Sha1::digest(fields);
    [digest[3], digest[2], digest[1], digest[0]]
}

fn non_empty(value: Option<&[u8]>) -> Option<&[u8]> {
    value.filter(|v| !v.is_empty())
}

fn put_sized(
    out: &mut Vec<u8>,
    chunk: u8,
    field: &'static str,
    value: &[u8],
) -> Result<(), FormatError> {
    if value.len() > MAX_FIELD_LEN {
        return Err(FormatError::FieldTooLong {
            field,
            len: value.len(),
        });
    }
    out.extend_from_slice(&[chunk, value.len() as u8]);
    out.extend_from_slice(value);
    Ok(())
}

fn put_date(
    out: &mut Vec<u8>,
    chunk: u8,
    field: &'static str,
    date: NaiveDate,
) -> Result<(), FormatError> {
    let year = u16::try_from(date.year()).map_err(|_| FormatError::YearOutOfRange {
        field,
        year: date.year(),
    })?;
    let [year_lo, year_hi] = year.to_le_bytes();
    out.extend_from_slice(&[chunk, date.day() as u8, date.month() as u8, year_lo, year_hi]);
    Ok(())
}

/// Bounds-checked cursor over record bytes
struct Reader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    fn next_tag(&mut self) -> Option<u8> {
        let b = *self.data.get(self.pos)?;
        self.pos += 1;
        Some(b)
    }

    fn take(&mut self, n: usize) -> Result<&'a [u8], FormatError> {
        let available = self.data.len() - self.pos;
        if available < n {
            return Err(FormatError::Truncated {
                offset: self.pos,
                needed: n,
                available,
            });
        }
        let data = self.data;
        let bytes = &data[self.pos..self.pos + n];
        self.pos += n;
        Ok(bytes)
    }

    fn byte(&mut self) -> Result<u8, FormatError> {
        Ok(self.take(1)?[0])
    }

    /// Length-prefixed payload
    fn sized(&mut self) -> Result<&'a [u8], FormatError> {
        let len = self.byte()?;
        self.take(len as usize)
    }

    fn text(&mut self, field: &'static str) -> Result<String, FormatError> {
        let bytes = self.sized()?;
        String::from_utf8(bytes.to_vec()).map_err(|_| FormatError::InvalidUtf8 { field })
    }

    fn date(&mut self, field: &'static str) -> Result<NaiveDate, FormatError> {
        let raw = self.take(4)?;
        let (day, month) = (raw[0], raw[1]);
        let year = u16::from_le_bytes([raw[2], raw[3]]);
        NaiveDate::from_ymd_opt(i32::from(year), u32::from(month), u32::from(day)).ok_or(
            FormatError::MalformedDate {
                field,
                year,
                month,
                day,
            },
        )
    }
}
