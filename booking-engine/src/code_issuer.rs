//! Reservation code issuance
//!
//! Codes come from a fixed-format space: a prefix plus a fixed-width
//! block of random digits. The issuer only produces candidates;
//! uniqueness is enforced at commit time by the reservation insert
//! (unique constraint, retried on collision by the caller).

use rand::Rng;

/// Default code prefix
pub const DEFAULT_CODE_PREFIX: &str = "TSR-";

/// Default random digit width (10^8 possible values)
pub const DEFAULT_CODE_DIGITS: u32 = 8;

/// Candidate generator for reservation codes
#[derive(Debug, Clone)]
pub struct CodeIssuer {
    prefix: String,
    digits: u32,
}

impl Default for CodeIssuer {
    fn default() -> Self {
        Self::new()
    }
}

impl CodeIssuer {
    pub fn new() -> Self {
        Self::with_format(DEFAULT_CODE_PREFIX, DEFAULT_CODE_DIGITS)
    }

    /// Custom prefix and digit width. Width is clamped to 1..=12 so the
    /// space stays addressable as a u64.
    pub fn with_format(prefix: impl Into<String>, digits: u32) -> Self {
        Self {
            prefix: prefix.into(),
            digits: digits.clamp(1, 12),
        }
    }

    /// Number of distinct codes this issuer can produce
    pub fn space_size(&self) -> u64 {
        10u64.pow(self.digits)
    }

    /// Draw a fresh candidate code
    pub fn candidate(&self) -> String {
        let n = rand::thread_rng().gen_range(0..self.space_size());
        format!("{}{:0width$}", self.prefix, n, width = self.digits as usize)
    }
}
