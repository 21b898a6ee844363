//! Caption time codes.
//!
//! A [`TimeCode`] is a non-negative duration with millisecond precision,
//! rendered as `MM:SS.mmm`. All arithmetic happens on the millisecond
//! representation; there are no calendar types involved, so formatting can
//! never pick up incidental date fields.

use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};

const MILLIS_PER_SECOND: u64 = 1_000;
const MILLIS_PER_MINUTE: u64 = 60_000;

/// A caption timestamp or duration, stored as milliseconds since the origin.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimeCode {
    millis: u64,
}

impl TimeCode {
    /// The zero origin.
    pub const ZERO: Self = Self { millis: 0 };

    /// Create a time code from a millisecond count.
    #[must_use]
    pub fn from_millis(millis: u64) -> Self {
        Self { millis }
    }

    /// Total milliseconds since the origin.
    #[must_use]
    pub fn as_millis(self) -> u64 {
        self.millis
    }

    /// Parse `MM:SS.mmm` text into a time code.
    ///
    /// Minutes and seconds are exactly two digits, seconds at most 59.
    /// Zero to three fractional digits are accepted and read left-aligned,
    /// so `"00:01.5"` is one second and 500 milliseconds.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MalformedTimeCode`] for any other shape.
    pub fn parse(text: &str) -> Result<Self> {
        let malformed = || Error::MalformedTimeCode {
            text: text.to_string(),
        };

        let (minutes, rest) = text.split_once(':').ok_or_else(malformed)?;
        let (seconds, fraction) = rest.split_once('.').ok_or_else(malformed)?;

        if minutes.len() != 2 || seconds.len() != 2 || fraction.len() > 3 {
            return Err(malformed());
        }
        let all_digits = |s: &str| s.bytes().all(|b| b.is_ascii_digit());
        if !all_digits(minutes) || !all_digits(seconds) || !all_digits(fraction) {
            return Err(malformed());
        }

        let minutes: u64 = minutes.parse().map_err(|_| malformed())?;
        let seconds: u64 = seconds.parse().map_err(|_| malformed())?;
        if seconds > 59 {
            return Err(malformed());
        }

        let mut millis = 0;
        for (i, digit) in fraction.bytes().enumerate() {
            #[allow(clippy::cast_possible_truncation)]
            let place = 10u64.pow(2 - i as u32);
            millis += u64::from(digit - b'0') * place;
        }

        Ok(Self {
            millis: minutes * MILLIS_PER_MINUTE + seconds * MILLIS_PER_SECOND + millis,
        })
    }

    /// Add a number of seconds. A negative operand clamps at the origin.
    #[must_use]
    pub fn add_secs(self, seconds: f64) -> Self {
        self.offset_millis(secs_to_millis(seconds))
    }

    /// Subtract a number of seconds, clamping at the origin.
    ///
    /// The clamp is a deliberate floor, not an error: time codes are never
    /// negative.
    #[must_use]
    pub fn sub_secs(self, seconds: f64) -> Self {
        self.offset_millis(-secs_to_millis(seconds))
    }

    /// Duration between two time codes, clamping at the origin when `other`
    /// is larger.
    #[must_use]
    pub fn saturating_sub(self, other: Self) -> Self {
        Self {
            millis: self.millis.saturating_sub(other.millis),
        }
    }

    /// Multiply by a factor.
    ///
    /// Generic primitive kept for completeness; the extraction flow only
    /// ever needs subtraction.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidTimeScale`] for non-finite or negative factors.
    pub fn scale(self, factor: f64) -> Result<Self> {
        if !factor.is_finite() || factor < 0.0 {
            return Err(Error::InvalidTimeScale { factor });
        }
        #[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let millis = (self.millis as f64 * factor).round() as u64;
        Ok(Self { millis })
    }

    /// Divide by a divisor.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidTimeScale`] for non-finite, zero, or negative
    /// divisors.
    pub fn div_by(self, divisor: f64) -> Result<Self> {
        if !divisor.is_finite() || divisor <= 0.0 {
            return Err(Error::InvalidTimeScale { factor: divisor });
        }
        self.scale(divisor.recip())
    }

    fn offset_millis(self, delta: i64) -> Self {
        let base = i64::try_from(self.millis).unwrap_or(i64::MAX);
        #[allow(clippy::cast_sign_loss)]
        let millis = base.saturating_add(delta).max(0) as u64;
        Self { millis }
    }
}

#[allow(clippy::cast_possible_truncation)]
fn secs_to_millis(seconds: f64) -> i64 {
    (seconds * 1_000.0).round() as i64
}

impl fmt::Display for TimeCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let minutes = self.millis / MILLIS_PER_MINUTE;
        let seconds = (self.millis / MILLIS_PER_SECOND) % 60;
        let millis = self.millis % MILLIS_PER_SECOND;
        write!(f, "{minutes:02}:{seconds:02}.{millis:03}")
    }
}

impl FromStr for TimeCode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}
