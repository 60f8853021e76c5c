//! Version parsing, normalisation, and comparison.
//!
//! UCMDB servers report their release in two textual shapes:
//!
//! - `YYYY.MM` — calendar releases, e.g. `2023.05` for May 2023.
//! - `YY.Q` — quarterly releases, e.g. `23.4` for Q4 2023.
//!
//! Both shapes normalise into a single [`VersionTuple`] so a requirement
//! declared in one shape can be checked against a server reporting the
//! other.

use serde::{Deserialize, Serialize};

use crate::errors::MalformedVersion;

/// A normalised server version: a calendar year and a month-scale period.
///
/// Ordering is lexicographic on `(year, period)`. Quarterly releases are
/// mapped onto the month axis before construction, so tuples derived from
/// either release shape compare directly.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct VersionTuple {
    year: u16,
    period: u8,
}

impl VersionTuple {
    /// Creates a tuple from a year and a month-scale period in `1..=12`.
    ///
    /// Intended for declaring requirement constants; panics (at compile time
    /// in const contexts) when `period` is out of range.
    pub const fn from_parts(year: u16, period: u8) -> Self {
        assert!(period >= 1 && period <= 12, "period must be within 1..=12");
        Self { year, period }
    }

    /// Returns the calendar year.
    pub fn year(self) -> u16 {
        self.year
    }

    /// Returns the month-scale period in `1..=12`.
    pub fn period(self) -> u8 {
        self.period
    }

    /// Returns `true` when this version meets `required`.
    ///
    /// The bound is inclusive: a version always satisfies itself.
    pub fn satisfies(self, required: VersionTuple) -> bool {
        self >= required
    }
}

impl std::fmt::Display for VersionTuple {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:04}.{:02}", self.year, self.period)
    }
}

// ---------------------------------------------------------------------------

/// The minimum server version under which an operation is defined to behave
/// correctly.
///
/// Declared per operation as a constant, in whichever shape the vendor
/// documentation uses:
///
/// ```
/// use compat::VersionRequirement;
///
/// const LIST_PACKAGES: VersionRequirement = VersionRequirement::calendar(2023, 5);
/// const MODELING_SEARCH: VersionRequirement = VersionRequirement::quarterly(2024, 2);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct VersionRequirement(VersionTuple);

impl VersionRequirement {
    /// A requirement expressed as a calendar release (`YYYY.MM`).
    pub const fn calendar(year: u16, month: u8) -> Self {
        Self(VersionTuple::from_parts(year, month))
    }

    /// A requirement expressed as a quarterly release (`YY.Q`, full year).
    ///
    /// The quarter maps to its closing month, the same policy
    /// [`normalize`] applies to quarterly version strings.
    pub const fn quarterly(year: u16, quarter: u8) -> Self {
        assert!(quarter >= 1 && quarter <= 4, "quarter must be within 1..=4");
        Self(VersionTuple::from_parts(year, quarter * 3))
    }

    /// The minimum [`VersionTuple`] this requirement demands.
    pub fn min_version(self) -> VersionTuple {
        self.0
    }
}

impl std::fmt::Display for VersionRequirement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ---------------------------------------------------------------------------

/// Parses a raw version string into a [`VersionTuple`].
///
/// Two shapes are recognised:
///
/// - `YYYY.MM`: four-digit year, a dot, then a one- or two-digit month in
///   `1..=12`. Normalises directly to `(year, month)`.
/// - `YY.Q`: two-digit year (interpreted as `2000 + YY`), a dot, then a
///   one-digit quarter in `1..=4`. The quarter maps to its closing month
///   (`Q * 3`), so `23.4` sorts with October–December 2023. End-of-quarter
///   is a fixed policy here; see the note on [`VersionRequirement`] for how
///   requirements opt into the same mapping.
///
/// Anything else — including three-component build versions such as
/// `11.8.0` — fails with [`MalformedVersion`].
pub fn normalize(raw: &str) -> Result<VersionTuple, MalformedVersion> {
    let trimmed = raw.trim();
    let Some((year_part, period_part)) = trimmed.split_once('.') else {
        return Err(malformed(raw));
    };
    if !is_digits(year_part) || !is_digits(period_part) {
        return Err(malformed(raw));
    }

    match (year_part.len(), period_part.len()) {
        // Shape A: YYYY.MM
        (4, 1 | 2) => {
            let year: u16 = year_part.parse().map_err(|_| malformed(raw))?;
            let month: u8 = period_part.parse().map_err(|_| malformed(raw))?;
            if !(1..=12).contains(&month) {
                return Err(malformed(raw));
            }
            Ok(VersionTuple {
                year,
                period: month,
            })
        }
        // Shape B: YY.Q
        (2, 1) => {
            let year: u16 = year_part.parse().map_err(|_| malformed(raw))?;
            let quarter: u8 = period_part.parse().map_err(|_| malformed(raw))?;
            if !(1..=4).contains(&quarter) {
                return Err(malformed(raw));
            }
            Ok(VersionTuple {
                year: 2000 + year,
                period: quarter * 3,
            })
        }
        _ => Err(malformed(raw)),
    }
}

fn malformed(raw: &str) -> MalformedVersion {
    MalformedVersion {
        raw: raw.to_owned(),
    }
}

fn is_digits(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn calendar_shape_normalises_directly() {
        for month in 1..=12u8 {
            let raw = format!("2023.{month:02}");
            assert_eq!(normalize(&raw).unwrap(), VersionTuple::from_parts(2023, month));
        }
        // Single-digit month without the leading zero is accepted too.
        assert_eq!(normalize("2024.5").unwrap(), VersionTuple::from_parts(2024, 5));
    }

    #[test]
    fn quarterly_shape_maps_to_closing_month() {
        for quarter in 1..=4u8 {
            let raw = format!("23.{quarter}");
            assert_eq!(
                normalize(&raw).unwrap(),
                VersionTuple::from_parts(2023, quarter * 3)
            );
        }
        assert_eq!(normalize("24.2").unwrap(), VersionTuple::from_parts(2024, 6));
        assert_eq!(normalize("25.4").unwrap(), VersionTuple::from_parts(2025, 12));
    }

    #[test]
    fn surrounding_whitespace_is_tolerated() {
        assert_eq!(normalize(" 2023.05 ").unwrap(), VersionTuple::from_parts(2023, 5));
    }

    #[test]
    fn unrecognised_shapes_are_rejected() {
        for raw in [
            "", "2023", "23", "11.8.0", "202.5", "20234.5", "2023.13", "2023.0", "23.5",
            "23.0", "23.45", "abc.1", "2023.", ".5", "2023.-1",
        ] {
            let err = normalize(raw).unwrap_err();
            assert_eq!(err.raw, raw, "expected '{raw}' to be malformed");
        }
    }

    #[test]
    fn satisfies_is_an_inclusive_lower_bound() {
        for raw in ["2023.05", "23.4", "2024.12", "24.1"] {
            let v = normalize(raw).unwrap();
            assert!(v.satisfies(v), "'{raw}' must satisfy itself");
        }
    }

    #[test]
    fn ordering_respects_the_calendar_not_the_shape() {
        let q4_2023 = VersionTuple::from_parts(2023, 4);
        let q2_2024 = VersionTuple::from_parts(2024, 2);
        assert!(q2_2024.satisfies(q4_2023));
        assert!(!q4_2023.satisfies(q2_2024));

        // May 2023 (calendar) predates Q4 2023 (quarterly, maps to December).
        let may_2023 = normalize("2023.05").unwrap();
        let q4_2023 = normalize("23.4").unwrap();
        assert!(q4_2023.satisfies(may_2023));
        assert!(!may_2023.satisfies(q4_2023));

        // Q2 2024 (quarterly, maps to June) trails August 2024.
        let aug_2024 = normalize("2024.08").unwrap();
        let q2_2024 = normalize("24.2").unwrap();
        assert!(aug_2024.satisfies(q2_2024));
        assert!(!q2_2024.satisfies(aug_2024));
    }

    #[test]
    fn requirement_constants_use_the_same_axis() {
        const CALENDAR: VersionRequirement = VersionRequirement::calendar(2023, 5);
        const QUARTERLY: VersionRequirement = VersionRequirement::quarterly(2023, 4);
        assert_eq!(CALENDAR.min_version(), normalize("2023.05").unwrap());
        assert_eq!(QUARTERLY.min_version(), normalize("23.4").unwrap());
    }

    #[test]
    fn display_is_zero_padded() {
        assert_eq!(VersionTuple::from_parts(2023, 5).to_string(), "2023.05");
        assert_eq!(
            VersionRequirement::quarterly(2024, 2).to_string(),
            "2024.06"
        );
    }
}
