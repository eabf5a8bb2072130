//! Price ranges and USD display formatting.
//!
//! Catalog prices are plain `f64` dollar amounts, stored and summed exactly
//! as the datastore returns them. Rounding only happens at the presentation
//! boundary in [`format_usd`].

use serde::{Deserialize, Serialize};

/// Errors that can occur when building a [`PriceRange`].
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum PriceRangeError {
    /// One of the bounds is NaN or infinite.
    #[error("price bounds must be finite")]
    NotFinite,
    /// The lower bound is above the upper bound.
    #[error("price range minimum {min} is above maximum {max}")]
    Inverted {
        /// Requested lower bound.
        min: f64,
        /// Requested upper bound.
        max: f64,
    },
    /// A `[min, max]` pair was expected.
    #[error("price range needs exactly two bounds, got {0}")]
    WrongLength(usize),
}

/// An inclusive `[min, max]` price filter.
///
/// Serialized as a two-element JSON array, which is how the product filter
/// endpoint receives its `radio` field.
///
/// ```
/// use emporium_core::PriceRange;
///
/// let range = PriceRange::new(20.0, 39.0).unwrap();
/// assert!(range.contains(20.0));
/// assert!(range.contains(39.0));
/// assert!(!range.contains(39.5));
/// assert_eq!(serde_json::to_string(&range).unwrap(), "[20.0,39.0]");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "[f64; 2]", into = "[f64; 2]")]
pub struct PriceRange {
    min: f64,
    max: f64,
}

impl PriceRange {
    /// Create a new range.
    ///
    /// # Errors
    ///
    /// Returns an error if either bound is not finite or `min > max`.
    pub fn new(min: f64, max: f64) -> Result<Self, PriceRangeError> {
        if !min.is_finite() || !max.is_finite() {
            return Err(PriceRangeError::NotFinite);
        }
        if min > max {
            return Err(PriceRangeError::Inverted { min, max });
        }
        Ok(Self { min, max })
    }

    /// Lower bound (inclusive).
    #[must_use]
    pub const fn min(&self) -> f64 {
        self.min
    }

    /// Upper bound (inclusive).
    #[must_use]
    pub const fn max(&self) -> f64 {
        self.max
    }

    /// Whether `price` falls inside the range, bounds included.
    #[must_use]
    pub fn contains(&self, price: f64) -> bool {
        price >= self.min && price <= self.max
    }
}

impl TryFrom<[f64; 2]> for PriceRange {
    type Error = PriceRangeError;

    fn try_from([min, max]: [f64; 2]) -> Result<Self, Self::Error> {
        Self::new(min, max)
    }
}

impl From<PriceRange> for [f64; 2] {
    fn from(range: PriceRange) -> Self {
        [range.min, range.max]
    }
}

/// Format a dollar amount as US currency, e.g. `$1,234.50`.
///
/// Rounds half away from zero to whole cents. Negative amounts get a
/// leading minus sign (`-$3.00`). Non-finite input is rendered as-is.
///
/// ```
/// use emporium_core::format_usd;
///
/// assert_eq!(format_usd(0.0), "$0.00");
/// assert_eq!(format_usd(1234.5), "$1,234.50");
/// assert_eq!(format_usd(19.999_999_999), "$20.00");
/// ```
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn format_usd(amount: f64) -> String {
    // Every f64 at or above 2^52 is a whole number of dollars
    const WHOLE_DOLLARS: f64 = 4_503_599_627_370_496.0;

    if !amount.is_finite() {
        return amount.to_string();
    }

    let magnitude = amount.abs();
    let (dollars, remainder) = if magnitude >= WHOLE_DOLLARS {
        (format!("{magnitude:.0}"), 0)
    } else {
        // Below 2^52 the cent count stays well inside u64
        let cents = (magnitude * 100.0).round() as u64;
        ((cents / 100).to_string(), cents % 100)
    };

    let mut grouped = String::with_capacity(dollars.len() + dollars.len() / 3);
    for (i, digit) in dollars.chars().enumerate() {
        if i > 0 && (dollars.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    let is_zero = remainder == 0 && dollars == "0";
    let sign = if amount < 0.0 && !is_zero { "-" } else { "" };
    format!("{sign}${grouped}.{remainder:02}")
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_range_rejects_inverted_bounds() {
        assert!(matches!(
            PriceRange::new(40.0, 20.0),
            Err(PriceRangeError::Inverted { .. })
        ));
    }

    #[test]
    fn test_range_rejects_nan() {
        assert_eq!(
            PriceRange::new(f64::NAN, 1.0),
            Err(PriceRangeError::NotFinite)
        );
    }

    #[test]
    fn test_range_deserializes_from_array() {
        let range: PriceRange = serde_json::from_str("[100, 9999]").unwrap();
        assert!((range.min() - 100.0).abs() < f64::EPSILON);
        assert!(range.contains(9999.0));
        assert!(!range.contains(99.99));
    }

    #[test]
    fn test_range_deserialize_rejects_inverted() {
        assert!(serde_json::from_str::<PriceRange>("[5, 1]").is_err());
    }

    #[test]
    fn test_format_usd_grouping() {
        assert_eq!(format_usd(1_000_000.0), "$1,000,000.00");
        assert_eq!(format_usd(999.99), "$999.99");
        assert_eq!(format_usd(12_345.678), "$12,345.68");
    }

    #[test]
    fn test_format_usd_negative() {
        assert_eq!(format_usd(-3.0), "-$3.00");
        assert_eq!(format_usd(-0.001), "$0.00");
    }

    #[test]
    fn test_format_usd_amounts_past_u64_cents() {
        assert_eq!(format_usd(1e18), "$1,000,000,000,000,000,000.00");
        assert_eq!(format_usd(-2e20), "-$200,000,000,000,000,000,000.00");

        let max = format_usd(f64::MAX);
        assert!(max.starts_with("$179,769,313,486,231,570,"), "{max}");
        assert!(max.ends_with(".00"), "{max}");
        assert_eq!(max.matches(',').count(), 102);
    }
}
