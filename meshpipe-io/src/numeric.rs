//! Locale-independent numeric parsing primitives
//!
//! OBJ is best-effort tolerant of malformed numbers: a bad float becomes
//! 0.0 and a bad index becomes absent, while the rest of the line still
//! parses. Integer parsing keeps success separate from the value so that
//! `0` (invalid as an OBJ index) and unparsable input stay distinguishable.

use meshpipe_core::ABSENT_INDEX;

/// Best-effort float parse; malformed input yields 0.0
pub fn parse_f32(token: &[u8]) -> f32 {
    std::str::from_utf8(token)
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(0.0)
}

/// Integer parse that distinguishes `0` from unparsable input
pub fn parse_i64(token: &[u8]) -> Option<i64> {
    std::str::from_utf8(token).ok()?.parse().ok()
}

/// Resolve a raw OBJ index against the count of same-kind entities seen so
/// far in the stream.
///
/// Positive indices are 1-based; negative indices count back from `seen`;
/// zero is invalid. Results outside `[0, u32::MAX)` become [`ABSENT_INDEX`].
pub fn normalize_index(raw: i64, seen: usize) -> u32 {
    if raw > 0 {
        let idx = raw - 1;
        if idx < ABSENT_INDEX as i64 {
            idx as u32
        } else {
            ABSENT_INDEX
        }
    } else if raw < 0 {
        let idx = seen as i64 + raw;
        if (0..ABSENT_INDEX as i64).contains(&idx) {
            idx as u32
        } else {
            ABSENT_INDEX
        }
    } else {
        ABSENT_INDEX
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_f32_forms() {
        assert_eq!(parse_f32(b"1.5"), 1.5);
        assert_eq!(parse_f32(b"-0.25"), -0.25);
        assert_eq!(parse_f32(b"+3"), 3.0);
        assert_eq!(parse_f32(b"1e3"), 1000.0);
        assert_eq!(parse_f32(b"2.5E-1"), 0.25);
    }

    #[test]
    fn test_parse_f32_malformed_defaults_to_zero() {
        assert_eq!(parse_f32(b""), 0.0);
        assert_eq!(parse_f32(b"abc"), 0.0);
        assert_eq!(parse_f32(b"1..5"), 0.0);
        assert_eq!(parse_f32(b"--1"), 0.0);
    }

    #[test]
    fn test_parse_i64() {
        assert_eq!(parse_i64(b"42"), Some(42));
        assert_eq!(parse_i64(b"-7"), Some(-7));
        assert_eq!(parse_i64(b"0"), Some(0));
        assert_eq!(parse_i64(b""), None);
        assert_eq!(parse_i64(b"1.5"), None);
        assert_eq!(parse_i64(b"x"), None);
    }

    #[test]
    fn test_normalize_positive_is_one_based() {
        assert_eq!(normalize_index(1, 0), 0);
        assert_eq!(normalize_index(10, 3), 9);
    }

    #[test]
    fn test_normalize_negative_counts_back_from_seen() {
        assert_eq!(normalize_index(-1, 5), 4);
        assert_eq!(normalize_index(-5, 5), 0);
        // Underflow past the first entity is absent.
        assert_eq!(normalize_index(-6, 5), ABSENT_INDEX);
    }

    #[test]
    fn test_normalize_invalid_inputs_are_absent() {
        assert_eq!(normalize_index(0, 100), ABSENT_INDEX);
        assert_eq!(normalize_index(u32::MAX as i64 + 1, 0), ABSENT_INDEX);
        assert_eq!(normalize_index(i64::MAX, 0), ABSENT_INDEX);
    }
}
