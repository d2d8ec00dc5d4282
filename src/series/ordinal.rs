use crate::error::{Result, SeriesError};

/// Ordinal suffix for a number: "st", "nd", "rd" or "th".
///
/// 11, 12 and 13 (and 111–113, 211–213, …) always take "th".
pub fn ordinal_suffix(value: u64) -> &'static str {
    if (11..=13).contains(&(value % 100)) {
        return "th";
    }
    match value % 10 {
        1 => "st",
        2 => "nd",
        3 => "rd",
        _ => "th",
    }
}

/// Formats a rank as an ordinal label, e.g. `22 → "22nd"`.
///
/// # Errors
///
/// Returns [`SeriesError::InvalidArgument`] for zero or negative values; ranks
/// start at 1.
pub fn ordinal(value: i64) -> Result<String> {
    let value = u64::try_from(value)
        .ok()
        .filter(|v| *v > 0)
        .ok_or_else(|| SeriesError::InvalidArgument(format!("rank must be positive, got {value}")))?;

    Ok(format!("{value}{}", ordinal_suffix(value)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ordinal_labels() {
        let cases = [
            (1, "1st"),
            (2, "2nd"),
            (3, "3rd"),
            (4, "4th"),
            (11, "11th"),
            (12, "12th"),
            (13, "13th"),
            (21, "21st"),
            (22, "22nd"),
            (23, "23rd"),
            (100, "100th"),
            (101, "101st"),
            (111, "111th"),
            (112, "112th"),
            (113, "113th"),
            (212, "212th"),
        ];
        for (value, expected) in cases {
            assert_eq!(ordinal(value).unwrap(), expected, "value {value}");
        }
    }

    #[test]
    fn test_zero_and_negative_are_invalid() {
        assert!(matches!(ordinal(0), Err(SeriesError::InvalidArgument(_))));
        assert!(matches!(ordinal(-3), Err(SeriesError::InvalidArgument(_))));
    }
}
