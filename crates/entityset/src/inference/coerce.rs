//! Value coercion: classify a raw scalar as INT64, DOUBLE or STRING.

use crate::entity::AttributeValue;

/// Parse a raw value as a float, ignoring surrounding whitespace.
///
/// Accepts anything `f64::from_str` does, including `inf` and `NaN`;
/// callers decide what to do with non-finite results.
pub fn parse_float(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok()
}

/// Returns true when the value parses to a finite float with no fractional part.
pub fn is_integral(raw: &str) -> bool {
    parse_float(raw).is_some_and(|v| v.is_finite() && v.fract() == 0.0)
}

/// Classify a raw value as an attribute value.
///
/// Never fails. Unparseable, NaN and infinite values stay strings with the
/// input text preserved exactly.
pub fn coerce(raw: &str) -> AttributeValue {
    let trimmed = raw.trim();

    // Exact path for plain integers, so large values keep full precision
    if !trimmed.contains('.') {
        if let Ok(int64_value) = trimmed.parse::<i64>() {
            return AttributeValue::Int64 { int64_value };
        }
    }

    match trimmed.parse::<f64>() {
        Ok(v) if v.is_finite() => {
            if v.fract() == 0.0 && v >= i64::MIN as f64 && v < i64::MAX as f64 {
                AttributeValue::Int64 {
                    int64_value: v as i64,
                }
            } else {
                AttributeValue::Double { double_value: v }
            }
        }
        _ => AttributeValue::Str {
            str_value: raw.to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn str_value(s: &str) -> AttributeValue {
        AttributeValue::Str {
            str_value: s.to_string(),
        }
    }

    #[test]
    fn test_integers() {
        assert_eq!(coerce("42"), AttributeValue::Int64 { int64_value: 42 });
        assert_eq!(coerce("-7"), AttributeValue::Int64 { int64_value: -7 });
        assert_eq!(coerce(" 12 "), AttributeValue::Int64 { int64_value: 12 });
        assert_eq!(
            coerce("9007199254740993"),
            AttributeValue::Int64 {
                int64_value: 9_007_199_254_740_993
            }
        );
    }

    #[test]
    fn test_integral_floats_are_int64() {
        assert_eq!(coerce("3.0"), AttributeValue::Int64 { int64_value: 3 });
        assert_eq!(coerce("1e3"), AttributeValue::Int64 { int64_value: 1000 });
    }

    #[test]
    fn test_doubles() {
        assert_eq!(coerce("41.2"), AttributeValue::Double { double_value: 41.2 });
        assert_eq!(coerce("-0.5"), AttributeValue::Double { double_value: -0.5 });
    }

    #[test]
    fn test_integral_beyond_i64_is_double() {
        assert_eq!(coerce("1e20"), AttributeValue::Double { double_value: 1e20 });
    }

    #[test]
    fn test_non_numeric_strings_preserved() {
        assert_eq!(coerce("person"), str_value("person"));
        assert_eq!(coerce(""), str_value(""));
        assert_eq!(coerce("  padded  "), str_value("  padded  "));
        assert_eq!(coerce("12abc"), str_value("12abc"));
    }

    #[test]
    fn test_non_finite_values_are_strings() {
        assert_eq!(coerce("NaN"), str_value("NaN"));
        assert_eq!(coerce("inf"), str_value("inf"));
        assert_eq!(coerce("-Infinity"), str_value("-Infinity"));
    }

    #[test]
    fn test_is_integral() {
        assert!(is_integral("42"));
        assert!(is_integral("42.0"));
        assert!(!is_integral("42.5"));
        assert!(!is_integral("inf"));
        assert!(!is_integral("abc"));
    }
}
