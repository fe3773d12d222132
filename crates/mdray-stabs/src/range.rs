//! Built-in range classification.
//!
//! STABS encodes built-in numeric types as ranges with textual bounds. The
//! encoding is compiler-dependent: bounds can be decimal or octal, 64- and
//! 128-bit bounds overflow a 64-bit parse, and floating-point types encode
//! their byte count in the low bound with a high bound of zero.

use mdray_types::BuiltInClass;

use crate::error::TranslateError;

/// Bound patterns that have to be matched as strings, either because the
/// values do not fit a 64-bit parse or because the pair has a special
/// meaning.
const STRING_PATTERNS: &[(&str, &str, BuiltInClass)] = &[
    ("4", "0", BuiltInClass::Float32),
    (
        "000000000000000000000000",
        "001777777777777777777777",
        BuiltInClass::Unsigned64,
    ),
    (
        "00000000000000000000000000000000000000000000",
        "00000000000000000000001777777777777777777777",
        BuiltInClass::Unsigned64,
    ),
    // IOP toolchain.
    ("0000000000000", "01777777777777777777777", BuiltInClass::Unsigned64),
    ("0", "18446744073709551615", BuiltInClass::Unsigned64),
    (
        "001000000000000000000000",
        "000777777777777777777777",
        BuiltInClass::Signed64,
    ),
    (
        "00000000000000000000001000000000000000000000",
        "00000000000000000000000777777777777777777777",
        BuiltInClass::Signed64,
    ),
    // IOP toolchain.
    ("01000000000000000000000", "0777777777777777777777", BuiltInClass::Signed64),
    ("-9223372036854775808", "9223372036854775807", BuiltInClass::Signed64),
    ("8", "0", BuiltInClass::Float64),
    (
        "00000000000000000000000000000000000000000000",
        "03777777777777777777777777777777777777777777",
        BuiltInClass::Unsigned128,
    ),
    (
        "02000000000000000000000000000000000000000000",
        "01777777777777777777777777777777777777777777",
        BuiltInClass::Signed128,
    ),
    (
        "000000000000000000000000",
        "0377777777777777777777777777777777",
        BuiltInClass::Unqualified128,
    ),
    ("16", "0", BuiltInClass::Float128),
    // Old homebrew toolchain.
    ("0", "-1", BuiltInClass::Unqualified128),
];

/// Bounds small enough to compare as integers.
const INTEGER_RANGES: &[(i64, i64, BuiltInClass)] = &[
    (0, 255, BuiltInClass::Unsigned8),
    (-128, 127, BuiltInClass::Signed8),
    (0, 127, BuiltInClass::Unqualified8),
    (0, 65535, BuiltInClass::Unsigned16),
    (-32768, 32767, BuiltInClass::Signed16),
    (0, 4294967295, BuiltInClass::Unsigned32),
    (-2147483648, 2147483647, BuiltInClass::Signed32),
];

/// Classifies the textual bounds of a range type as a built-in class.
pub fn classify_range(low: &str, high: &str) -> Result<BuiltInClass, TranslateError> {
    for &(pattern_low, pattern_high, class) in STRING_PATTERNS {
        if low == pattern_low && high == pattern_high {
            return Ok(class);
        }
    }

    // For smaller values the bounds are actually parsed as integers.
    let low_value = parse_bound(low, "low")?;
    let high_value = parse_bound(high, "high")?;

    for &(range_low, range_high, class) in INTEGER_RANGES {
        // Some emitters omit the sign on the low bound, so the negated value
        // is accepted too. The intent behind this is uncertain; it is kept
        // as observed.
        let low_matches = range_low == low_value
            || low_value.checked_neg().is_some_and(|negated| range_low == negated);
        if low_matches && range_high == high_value {
            return Ok(class);
        }
    }

    Err(TranslateError::UnclassifiedRange {
        low: low.to_string(),
        high: high.to_string(),
    })
}

/// Parses a range bound, octal when it has a leading zero.
fn parse_bound(value: &str, bound: &'static str) -> Result<i64, TranslateError> {
    let radix = if value.starts_with('0') { 8 } else { 10 };
    i64::from_str_radix(value, radix).map_err(|source| TranslateError::IntegerParse {
        bound,
        value: value.to_string(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_integer_ranges() {
        assert_eq!(classify_range("0", "255").unwrap(), BuiltInClass::Unsigned8);
        assert_eq!(classify_range("-128", "127").unwrap(), BuiltInClass::Signed8);
        assert_eq!(classify_range("0", "127").unwrap(), BuiltInClass::Unqualified8);
        assert_eq!(classify_range("0", "65535").unwrap(), BuiltInClass::Unsigned16);
        assert_eq!(classify_range("-32768", "32767").unwrap(), BuiltInClass::Signed16);
        assert_eq!(classify_range("0", "4294967295").unwrap(), BuiltInClass::Unsigned32);
        assert_eq!(
            classify_range("-2147483648", "2147483647").unwrap(),
            BuiltInClass::Signed32
        );
    }

    #[test]
    fn test_negated_low_bound_accepted() {
        assert_eq!(classify_range("128", "127").unwrap(), BuiltInClass::Signed8);
        assert_eq!(
            classify_range("2147483648", "2147483647").unwrap(),
            BuiltInClass::Signed32
        );
    }

    #[test]
    fn test_octal_bounds() {
        // 0200 == 128 and 0177 == 127: an octal signed 8-bit range.
        assert_eq!(classify_range("0200", "0177").unwrap(), BuiltInClass::Signed8);
    }

    #[test]
    fn test_floating_point_widths() {
        assert_eq!(classify_range("4", "0").unwrap(), BuiltInClass::Float32);
        assert_eq!(classify_range("8", "0").unwrap(), BuiltInClass::Float64);
        assert_eq!(classify_range("16", "0").unwrap(), BuiltInClass::Float128);
    }

    #[test]
    fn test_wide_patterns() {
        assert_eq!(
            classify_range("0", "18446744073709551615").unwrap(),
            BuiltInClass::Unsigned64
        );
        assert_eq!(
            classify_range("-9223372036854775808", "9223372036854775807").unwrap(),
            BuiltInClass::Signed64
        );
        assert_eq!(
            classify_range("01000000000000000000000", "0777777777777777777777").unwrap(),
            BuiltInClass::Signed64
        );
        assert_eq!(
            classify_range("0", "-1").unwrap(),
            BuiltInClass::Unqualified128
        );
    }

    #[test]
    fn test_unclassified_range() {
        let result = classify_range("0", "1000000");
        assert!(matches!(result, Err(TranslateError::UnclassifiedRange { .. })));
    }

    #[test]
    fn test_unparseable_bound() {
        let result = classify_range("zero", "255");
        assert!(matches!(result, Err(TranslateError::IntegerParse { .. })));
    }

    /// Serializing a class back out as its canonical bounds and classifying
    /// again lands on the same class.
    #[test]
    fn test_round_trip_canonical_bounds() {
        let canonical: &[(BuiltInClass, &str, &str)] = &[
            (BuiltInClass::Unsigned8, "0", "255"),
            (BuiltInClass::Signed8, "-128", "127"),
            (BuiltInClass::Unqualified8, "0", "127"),
            (BuiltInClass::Unsigned16, "0", "65535"),
            (BuiltInClass::Signed16, "-32768", "32767"),
            (BuiltInClass::Unsigned32, "0", "4294967295"),
            (BuiltInClass::Signed32, "-2147483648", "2147483647"),
            (BuiltInClass::Unsigned64, "0", "18446744073709551615"),
            (BuiltInClass::Signed64, "-9223372036854775808", "9223372036854775807"),
            (BuiltInClass::Float32, "4", "0"),
            (BuiltInClass::Float64, "8", "0"),
            (BuiltInClass::Float128, "16", "0"),
        ];
        for &(class, low, high) in canonical {
            assert_eq!(classify_range(low, high).unwrap(), class, "({low}, {high})");
        }
    }
}
