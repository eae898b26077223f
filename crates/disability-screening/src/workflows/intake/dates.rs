use std::fmt;

use chrono::NaiveDate;

/// Masked length of `mm/yyyy`.
const MASKED_LEN: usize = 7;

/// Reformat free-form input into `mm/yyyy` as the user types.
///
/// Non-digits are stripped. Up to two digits are left as-is; beyond that a `/`
/// is inserted after the month and at most four year digits are kept.
pub fn mask_month_year(raw: &str) -> String {
    let digits: String = raw.chars().filter(char::is_ascii_digit).collect();
    if digits.len() <= 2 {
        return digits;
    }

    let year_end = digits.len().min(6);
    format!("{}/{}", &digits[..2], &digits[2..year_end])
}

/// A complete `mm/yyyy` value with a real calendar month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MonthYear {
    // Field order drives the derived chronological ordering.
    year: i32,
    month: u32,
}

impl MonthYear {
    pub fn new(month: u32, year: i32) -> Option<Self> {
        (1..=12).contains(&month).then_some(Self { year, month })
    }

    /// Parse a fully masked `mm/yyyy` value; partial input yields `None`.
    pub fn parse(raw: &str) -> Option<Self> {
        if raw.len() != MASKED_LEN {
            return None;
        }
        let (month, year) = raw.split_once('/')?;
        if month.len() != 2 || !month.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        if year.len() != 4 || !year.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }

        Self::new(month.parse().ok()?, year.parse().ok()?)
    }

    pub const fn month(self) -> u32 {
        self.month
    }

    pub const fn year(self) -> i32 {
        self.year
    }

    pub fn first_day(self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year, self.month, 1)
    }
}

impl fmt::Display for MonthYear {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}/{:04}", self.month, self.year)
    }
}

/// Latest parseable value, keeping the earliest entry on ties.
pub fn latest<'a, I>(values: I) -> Option<MonthYear>
where
    I: IntoIterator<Item = &'a str>,
{
    values
        .into_iter()
        .filter_map(MonthYear::parse)
        .fold(None, |latest, candidate| match latest {
            Some(current) if candidate <= current => Some(current),
            _ => Some(candidate),
        })
}
