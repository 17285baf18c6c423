//! Human-readable byte sizes ("10MB", "512KiB", "1Gb").

use crate::core::error::{Result, SpaceriniError};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

static SIZE_PATTERN: Lazy<Option<Regex>> =
    Lazy::new(|| Regex::new(r"^\s*(\d+)\s*([A-Za-z]*)\s*$").ok());

/// A positive byte count
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ByteSize(u64);

impl ByteSize {
    pub fn new(bytes: u64) -> Result<Self> {
        if bytes == 0 {
            return Err(SpaceriniError::SizeParse(
                "size must be greater than zero".to_string(),
            ));
        }
        Ok(Self(bytes))
    }

    /// Parse a size expression
    ///
    /// Binary units (`KiB`..`PiB`) are powers of two, decimal units
    /// (`KB`..`PB`) powers of ten. Binary units are matched case-insensitively
    /// and always count bytes; a decimal unit with a lowercase trailing `b`
    /// counts bits. Bare digits are bytes.
    pub fn parse(input: &str) -> Result<Self> {
        let invalid = || SpaceriniError::SizeParse(format!("'{input}'"));

        let caps = SIZE_PATTERN
            .as_ref()
            .and_then(|re| re.captures(input))
            .ok_or_else(invalid)?;
        let value: u64 = caps[1].parse().map_err(|_| invalid())?;
        let unit = &caps[2];

        let multiplier = unit_multiplier(unit).ok_or_else(invalid)?;
        let binary = unit.to_ascii_uppercase().ends_with("IB");
        let bits = !binary && unit.len() > 1 && unit.ends_with('b');
        let bytes = value.checked_mul(multiplier).ok_or_else(invalid)?;
        let bytes = if bits { bytes / 8 } else { bytes };

        Self::new(bytes).map_err(|_| invalid())
    }

    pub fn as_u64(self) -> u64 {
        self.0
    }
}

fn unit_multiplier(unit: &str) -> Option<u64> {
    if unit.is_empty() {
        return Some(1);
    }

    let upper = unit.to_ascii_uppercase();
    let (prefix, binary) = match upper.strip_suffix("IB") {
        Some(prefix) => (prefix, true),
        None => (upper.strip_suffix('B')?, false),
    };

    let exponent = match prefix {
        "" => 0,
        "K" => 1,
        "M" => 2,
        "G" => 3,
        "T" => 4,
        "P" => 5,
        _ => return None,
    };

    let base: u64 = if binary { 1024 } else { 1000 };
    Some(base.pow(exponent))
}

impl FromStr for ByteSize {
    type Err = SpaceriniError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for ByteSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}B", self.0)
    }
}
