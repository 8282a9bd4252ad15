//! Clock strings for the ruler and the seek prompt

use crate::error::EditorError;

/// Parse `"s"`, `"m:s"` or `"h:m:s"` into seconds; blank input is zero
pub fn parse_timecode(input: &str) -> Result<f64, EditorError> {
    let input = input.trim();
    if input.is_empty() {
        return Ok(0.0);
    }

    let fields: Vec<&str> = input.split(':').collect();
    if fields.len() > 3 {
        return Err(EditorError::InvalidTimecode(input.to_string()));
    }

    let mut seconds = 0u64;
    for field in &fields {
        let value: u64 = field
            .trim()
            .parse()
            .map_err(|_| EditorError::InvalidTimecode(input.to_string()))?;
        seconds = seconds * 60 + value;
    }
    Ok(seconds as f64)
}

/// Ruler label for a whole second: `m:ss`
pub fn ruler_label(second: u64) -> String {
    format!("{}:{:02}", second / 60, second % 60)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_one_to_three_fields() {
        assert_eq!(parse_timecode("45").unwrap(), 45.0);
        assert_eq!(parse_timecode("2:05").unwrap(), 125.0);
        assert_eq!(parse_timecode("1:0:3").unwrap(), 3603.0);
        assert_eq!(parse_timecode("  ").unwrap(), 0.0);
    }

    #[test]
    fn rejects_malformed() {
        assert!(parse_timecode("1:2:3:4").is_err());
        assert!(parse_timecode("a:10").is_err());
        assert!(parse_timecode("1.5").is_err());
        assert!(parse_timecode("-3").is_err());
    }

    #[test]
    fn labels() {
        assert_eq!(ruler_label(0), "0:00");
        assert_eq!(ruler_label(9), "0:09");
        assert_eq!(ruler_label(75), "1:15");
    }
}
