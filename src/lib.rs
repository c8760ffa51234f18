use lazy_static::lazy_static;
use regex::Regex;

pub mod domain;
pub mod dto;
pub mod forms;
pub mod models;
pub mod preview;
pub mod services;

pub const MIB: u64 = 1024 * 1024;

/// Per-photo size cap applied unless configured otherwise.
pub const DEFAULT_MAX_PHOTO_BYTES: u64 = 5 * MIB;

/// Values offered by the "max photos" selector.
pub const MAX_PHOTOS_CHOICES: std::ops::RangeInclusive<u8> = 1..=5;

pub const DEFAULT_MAX_PHOTOS: u8 = 3;

lazy_static! {
    pub static ref PHONE_REGEX: Regex = Regex::new(r"^[0-9]{10}$").unwrap();
}
