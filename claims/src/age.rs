//! Age computation from a birthdate.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::ClaimError;

/// Age at which a subject is a major.
pub const MAJORITY_AGE: u32 = 18;

/// Earliest accepted birth year.
const MIN_BIRTH_YEAR: i32 = 1900;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgeResult {
    pub age: u32,
    pub is_major: bool,
}

/// Build a birthdate from its calendar fields.
///
/// Rejects out-of-range fields, impossible dates such as February 30th, and
/// years before 1900.
pub fn birth_date_from_parts(day: u32, month: u32, year: i32) -> Result<NaiveDate, ClaimError> {
    if year < MIN_BIRTH_YEAR {
        return Err(ClaimError::Validation(format!(
            "birth year {year} is before {MIN_BIRTH_YEAR}"
        )));
    }
    NaiveDate::from_ymd_opt(year, month, day).ok_or_else(|| {
        ClaimError::Validation(format!("{year:04}-{month:02}-{day:02} is not a calendar date"))
    })
}

/// Whole years between `birth` and `reference`.
///
/// The age goes up on the birthday itself; a February 29th birthday counts
/// from March 1st in non-leap years.
pub fn compute_age(birth: NaiveDate, reference: NaiveDate) -> Result<AgeResult, ClaimError> {
    if birth > reference {
        return Err(ClaimError::Validation("birthdate is in the future".into()));
    }
    let mut years = reference.year() - birth.year();
    if (reference.month(), reference.day()) < (birth.month(), birth.day()) {
        years -= 1;
    }
    let age = u32::try_from(years).unwrap_or(0);
    Ok(AgeResult {
        age,
        is_major: age >= MAJORITY_AGE,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn adult_born_2000() {
        let r = compute_age(date(2000, 1, 1), date(2024, 6, 1)).unwrap();
        assert_eq!(r, AgeResult { age: 24, is_major: true });
    }

    #[test]
    fn minor_born_2010() {
        let r = compute_age(date(2010, 1, 1), date(2024, 6, 1)).unwrap();
        assert_eq!(r, AgeResult { age: 14, is_major: false });
    }

    #[test]
    fn majority_starts_on_the_birthday() {
        let birth = date(2006, 6, 1);
        assert!(!compute_age(birth, date(2024, 5, 31)).unwrap().is_major);
        assert_eq!(compute_age(birth, date(2024, 5, 31)).unwrap().age, 17);
        assert!(compute_age(birth, date(2024, 6, 1)).unwrap().is_major);
    }

    #[test]
    fn leap_day_birthday() {
        let birth = date(2004, 2, 29);
        assert_eq!(compute_age(birth, date(2022, 2, 28)).unwrap().age, 17);
        assert_eq!(compute_age(birth, date(2022, 3, 1)).unwrap().age, 18);
    }

    #[test]
    fn born_today_is_zero() {
        let today = date(2024, 6, 1);
        assert_eq!(compute_age(today, today).unwrap().age, 0);
    }

    #[test]
    fn future_birthdate_rejected() {
        assert!(matches!(
            compute_age(date(2030, 1, 1), date(2024, 6, 1)),
            Err(ClaimError::Validation(_))
        ));
    }

    #[test]
    fn impossible_dates_rejected() {
        assert!(birth_date_from_parts(30, 2, 2000).is_err());
        assert!(birth_date_from_parts(29, 2, 2001).is_err());
        assert!(birth_date_from_parts(0, 1, 2000).is_err());
        assert!(birth_date_from_parts(1, 13, 2000).is_err());
        assert!(birth_date_from_parts(1, 1, 1850).is_err());
        assert_eq!(birth_date_from_parts(29, 2, 2000).unwrap(), date(2000, 2, 29));
    }
}
