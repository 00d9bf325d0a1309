//! Shared fixtures for serial number tests.

#![allow(dead_code)]

use chrono::NaiveDate;
use vmp_keygen::{KeyConfig, License};

pub const PUBLIC: &str = "AAEAAQ==";
pub const PRODUCT_CODE: &str = "XgdTzLalxNk=";
pub const PRODUCT_CODE_BYTES: [u8; 8] = [0x5e, 0x07, 0x53, 0xcc, 0xb6, 0xa5, 0xc4, 0xd9];

/// 2048-bit key pair exported by the protection tool.
pub const PRIVATE_2048: &str = "SHqphqqk10w3aJDHhIMkAj/FYY5R1cr6X/fQn7fVKcdVxgd+DpMrtmYi4zeOlQGB0x5Rj9JBftC65cmPUO98gSCQiqwhV9BL1P39cw4vORAA0MH+0EMTQJC/Nqfoi1iw1x4mojOCemFAqHckO2u2hksg/fcf1p/OhL/LI2ZkjsBEb502L4Okr+30rXtDWaHKdoN+Ey/wM8woN5RHmVkx44HW+aCqfGu+sDJw/juvWETV3WblEV07HBXwfvQu19L85JIeTM27+TVd57lzdhKdyuel156KHYu8lGbRLDQW4XE+G+RwhEeCN0SA70qiy1yFOUwwUCsZ2ytpyZshJFmHaQ==";
pub const MODULUS_2048: &str = "tZy2ayOS55H48Nwv7wjN6OsPbcRs63aeunCfz4kHMLL+tinVe4E2K9kOoF4jGsVAf3pOJa5m9Wbqe0+secmnEvMqOhZgBI696mMEir+R0jSAJj01byOw/UTp7DNRxRHnWjlQoCZB4/INgSDnVJhvSZJPlea+3BXHfZwky1PF/Tcg7XIiLQEQguaIShoxsOAo6wTmQ1bfXx2DyBc9La2SBqMj5+C4uU6958N81MUkVixRpiLTfMdZBxJu215NslLuQI82FyoD8T+57l9UvdEwsq24Bw9IeNbe781J0eFVJgcaNBiOaon18Xb1jzgLCdMLU5lyzACjdPX5Fb2j5Uvhzw==";

/// 512-bit test key pair.
pub const PRIVATE_512: &str = "XtQxvmhHaXNHSgc+tEh0Z+cYQ4cLS6R++bwJ6NBTqO1y2DIVwFVmwjKoBCsUdXFMDRXI018kyqMG4vZYOph2LQ==";
pub const MODULUS_512: &str = "lyYwPmxiKNkF1F7dr1EGZX7PCQrR5lWmi1jjaJ6FNbNsJ718uuN+2SJCjCPg8ah+3FoZhdTK1Gyw5gjYo7gnPQ==";

// Serials produced by an independent implementation of the format.

/// [`sample_license`] signed with the 2048-bit key.
pub const SERIAL_2048: &str = "LVVibS4BBGAQjpmm9ohP4oqQUJXCfXaoOJQh7bI0X8QVXb0325jY8nyOL2qIpgKq3yItL8mujkv3uGaWDzIiMfPIkMQu5JXLVeJJEj8U6yXkeFToK2nw+tK/2DdCYozQIgDGb7W+gJKlw4qikkakX2oDPZfxfadsbhOdSjolQZYoSeLRmkxiIZIAW2KINJalQO5RqyVbUsidPg9zMszAtraGk/J5q0vBtxvuPdMPBFV3T7wcCzXZPnlSeXcW6BQCbDydNt5p23urbJ06UeNUzD6YgLLLzMThXPerqN2tYV250K9c3GjToJxbyDd/LzUtgBflslNvdzSwgXLbMKyPvQ==";
/// name "alice", expires 2030-01-31, max build 2024-06-01, 512-bit key.
pub const SERIAL_512: &str = "aF61+hnqDgBjropz6SSUKXv3vI56B2mpC88bXai7XKrzxmCHNX+fvIESumulBa+OPqSsmj4CZ0W+aT5CntK5VA==";
/// Well-formed version 2 record, 512-bit key.
pub const SERIAL_512_VERSION_2: &str = "Mz8A3fpcxp9CxpNYcqDgTbUIubzt3pZ+C2y9Y8UMEcxTwqTUtBa0Roj8/g7kmzCbJmY5BRj6px8WfkjgQrzQYg==";
/// Product code of all zeros, 512-bit key.
pub const SERIAL_512_OTHER_PRODUCT: &str = "VCraBu1IJFdgxTdh3+fr7MOqo7GJf6ZVeLJdD6+uTqMh619Gs6e51hUli+swd3CJfhf2nQvwQKzIHGS4xvAaKQ==";
/// name "bob", 512-bit key; the signature has a leading zero byte, so it
/// decodes to 63 bytes instead of 64.
pub const SERIAL_512_SHORT: &str = "M+lDpplFgVu9mks+2Sck/hgC3lO69yb3gmriH2tskhV6yw6Qyoj2B5YoPgc6oa/RzbE2nf9q67ozG2qHmfh2";
/// Checksum bytes inverted, 512-bit key.
pub const SERIAL_512_BAD_CHECKSUM: &str = "VF0FJuN+dCZitFkP8Z+txnoCKyNL8hIboz0MfaHVzbfr+lF+RiafIZo3Huq91Z7ietFRA6vEEeA2IgDkLrFV6w==";

pub fn config_2048() -> KeyConfig {
    KeyConfig::new("RSA", 2048, PRIVATE_2048, MODULUS_2048, PRODUCT_CODE).unwrap()
}

pub fn config_512() -> KeyConfig {
    KeyConfig::new("RSA", 512, PRIVATE_512, MODULUS_512, PRODUCT_CODE).unwrap()
}

/// Key export text in the format written by the protection tool.
pub fn export_2048() -> String {
    format!(
        "/*\n$exported_algorithm = \"RSA\";\n$exported_bits = 2048;\n$exported_private = \"{PRIVATE_2048}\";\n$exported_modulus = \"{MODULUS_2048}\";\n$exported_product_code = \"{PRODUCT_CODE}\";\n*/\n"
    )
}

pub fn sample_license() -> License {
    License {
        name: Some("testUser".to_string()),
        email: Some("admin@qq.com".to_string()),
        expiration: NaiveDate::from_ymd_opt(2017, 10, 19),
        hardware_id: Some(vec![0, 1, 2, 3]),
        running_time_limit: Some(200),
        user_data: Some(b"UserData, length <= 255".to_vec()),
        version: Some(1),
        ..Default::default()
    }
}
