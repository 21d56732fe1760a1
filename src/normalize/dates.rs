//! Date coercion for handwritten form dates.
//!
//! Forms carry dates like `3/4/25` or `03-04-1999`. Everything is coerced
//! to ISO `YYYY-MM-DD` for downstream rendering. Coercion is total:
//! unparseable input passes through unchanged.

use chrono::{Datelike, NaiveDate};

/// Convert a month/day/year date string to `YYYY-MM-DD`.
///
/// Two-digit years pivot on `today`: a value greater than today's
/// two-digit year lands in the previous century, anything else in the
/// current one. Input that does not look like a date is returned as is.
pub fn to_iso_date(raw: &str, today: NaiveDate) -> String {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return String::new();
    }

    // Already ISO shaped
    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return date.format("%Y-%m-%d").to_string();
    }

    let separator = if trimmed.contains('/') {
        '/'
    } else if trimmed.contains('-') {
        '-'
    } else {
        return raw.to_string();
    };

    let parts: Vec<&str> = trimmed.split(separator).collect();
    if parts.len() != 3 {
        return raw.to_string();
    }

    let month: u32 = match parts[0].trim().parse() {
        Ok(m) => m,
        Err(_) => return raw.to_string(),
    };
    let day: u32 = match parts[1].trim().parse() {
        Ok(d) => d,
        Err(_) => return raw.to_string(),
    };
    let year_part = parts[2].trim();
    let year: i32 = match year_part.parse() {
        Ok(y) => y,
        Err(_) => return raw.to_string(),
    };

    let year = if year_part.len() == 2 {
        let current_year = today.year();
        let current_century = current_year / 100 * 100;
        if year > current_year % 100 {
            current_century - 100 + year
        } else {
            current_century + year
        }
    } else {
        year
    };

    if !(1..=12).contains(&month) || !(1..=31).contains(&day) {
        return raw.to_string();
    }

    format!("{:04}-{:02}-{:02}", year, month, day)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 15).unwrap()
    }

    #[test]
    fn test_two_digit_year_current_century() {
        assert_eq!(to_iso_date("03/04/25", today()), "2025-03-04");
    }

    #[test]
    fn test_two_digit_year_previous_century() {
        assert_eq!(to_iso_date("03/04/99", today()), "1999-03-04");
    }

    #[test]
    fn test_four_digit_year() {
        assert_eq!(to_iso_date("1/2/1990", today()), "1990-01-02");
    }

    #[test]
    fn test_dash_separator() {
        assert_eq!(to_iso_date("12-31-07", today()), "2007-12-31");
    }

    #[test]
    fn test_iso_passthrough() {
        assert_eq!(to_iso_date("1990-01-02", today()), "1990-01-02");
    }

    #[test]
    fn test_unparseable_returned_unchanged() {
        assert_eq!(to_iso_date("next Tuesday", today()), "next Tuesday");
        assert_eq!(to_iso_date("13/40/25", today()), "13/40/25");
        assert_eq!(to_iso_date("3/4", today()), "3/4");
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(to_iso_date("  ", today()), "");
    }

    #[test]
    fn test_pads_month_and_day() {
        assert_eq!(to_iso_date("7/9/24", today()), "2024-07-09");
    }
}
