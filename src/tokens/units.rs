/// Unit conversion and tolerant number parsing for chain responses
///
/// Raw amounts are `U256`, the width of an ERC-20/TRC-20 balance. Values that
/// do not fit are malformed and read as absent.
use alloy::primitives::utils::format_units as alloy_format_units;
use alloy::primitives::U256;
use serde_json::Value;

/// Render `raw / 10^decimals` exactly, always with at least one fractional digit
pub fn format_units(raw: U256, decimals: u8) -> String {
    let rendered = match alloy_format_units(raw, decimals) {
        Ok(rendered) => rendered,
        // Beyond 10^77 every U256 is below one whole unit
        Err(_) => format!("0.{:0>width$}", raw.to_string(), width = decimals as usize),
    };

    match rendered.split_once('.') {
        Some((int_part, frac_part)) => {
            let trimmed = frac_part.trim_end_matches('0');
            if trimmed.is_empty() {
                format!("{}.0", int_part)
            } else {
                format!("{}.{}", int_part, trimmed)
            }
        }
        None => format!("{}.0", rendered),
    }
}

/// Parse a hex quantity with optional `0x` prefix; `"0x"` reads as zero
pub fn parse_hex_quantity(value: &str) -> Option<U256> {
    let value = value.trim();
    let body = value
        .strip_prefix("0x")
        .or_else(|| value.strip_prefix("0X"))
        .unwrap_or(value);

    if !body.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }

    let significant = body.trim_start_matches('0');
    if significant.is_empty() {
        return Some(U256::ZERO);
    }
    U256::from_str_radix(significant, 16).ok()
}

/// Parse a base-10 integer string, ignoring any fractional part
pub fn parse_decimal_integer(value: &str) -> Option<U256> {
    let value = value.trim();
    let int_part = value.split('.').next().unwrap_or_default();
    if int_part.is_empty() || !int_part.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    U256::from_str_radix(int_part, 10).ok()
}

/// Non-negative integer from a JSON number, decimal string, or hex string
pub fn value_to_u256(value: &Value) -> Option<U256> {
    match value {
        Value::Number(n) => {
            if let Some(v) = n.as_u64() {
                Some(U256::from(v))
            } else {
                n.as_f64()
                    .filter(|v| *v >= 0.0 && v.is_finite())
                    .and_then(|v| parse_decimal_integer(&format!("{:.0}", v.trunc())))
            }
        }
        Value::String(s) if s.trim_start().starts_with("0x") => parse_hex_quantity(s),
        Value::String(s) => parse_decimal_integer(s),
        _ => None,
    }
}

/// Decimals field that may be reported as a number or a string
pub fn value_to_u8(value: &Value) -> Option<u8> {
    value_to_u256(value).and_then(|v| u8::try_from(v).ok())
}

/// Serde adapter writing raw amounts as base-10 strings
pub mod raw_amount {
    use alloy::primitives::U256;
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &U256, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&value.to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<U256, D::Error> {
        let text = String::deserialize(deserializer)?;
        let parsed = if text.trim_start().starts_with("0x") {
            super::parse_hex_quantity(&text)
        } else {
            super::parse_decimal_integer(&text)
        };
        parsed.ok_or_else(|| de::Error::custom(format!("invalid raw amount '{}'", text)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn u(value: u128) -> U256 {
        U256::from(value)
    }

    #[test]
    fn test_format_units() {
        assert_eq!(format_units(u(1_000_000), 6), "1.0");
        assert_eq!(format_units(U256::ZERO, 6), "0.0");
        assert_eq!(format_units(u(1), 6), "0.000001");
        assert_eq!(format_units(u(123_456_789), 6), "123.456789");
        assert_eq!(format_units(u(1_500_000_000_000_000_000), 18), "1.5");
        assert_eq!(format_units(u(42), 0), "42.0");
    }

    #[test]
    fn test_format_units_above_u128() {
        // 2^136 raw units at 18 decimals
        let raw = U256::from(1u8) << 136usize;
        assert_eq!(raw.to_string(), "87112285931760246646623899502532662132736");
        assert_eq!(
            format_units(raw, 18),
            "87112285931760246646623.899502532662132736"
        );
        assert_eq!(format_units(U256::MAX, 0), format!("{}.0", U256::MAX));
    }

    #[test]
    fn test_format_units_huge_decimals() {
        let formatted = format_units(u(u128::MAX), 77);
        assert!(formatted.starts_with("0.000"));
        let past_limit = format_units(u(5), 80);
        assert_eq!(past_limit, format!("0.{}5", "0".repeat(79)));
    }

    #[test]
    fn test_parse_hex_quantity() {
        assert_eq!(parse_hex_quantity("0x"), Some(U256::ZERO));
        assert_eq!(parse_hex_quantity("0x0"), Some(U256::ZERO));
        assert_eq!(parse_hex_quantity("0xf4240"), Some(u(1_000_000)));
        assert_eq!(
            parse_hex_quantity("0x00000000000000000000000000000000000000000000000000000000000f4240"),
            Some(u(1_000_000))
        );
        assert_eq!(
            parse_hex_quantity(&format!("0x1{}", "0".repeat(34))),
            Some(U256::from(1u8) << 136usize)
        );
        // Wider than 256 bits
        assert_eq!(parse_hex_quantity(&format!("0x1{}", "0".repeat(64))), None);
        assert_eq!(parse_hex_quantity("0xzz"), None);
    }

    #[test]
    fn test_parse_decimal_integer() {
        assert_eq!(parse_decimal_integer("1000000"), Some(u(1_000_000)));
        assert_eq!(parse_decimal_integer(" 12.0 "), Some(u(12)));
        assert_eq!(parse_decimal_integer("-5"), None);
        assert_eq!(parse_decimal_integer(""), None);
        assert_eq!(
            parse_decimal_integer(&"9".repeat(50)).map(|v| v.to_string()),
            Some("9".repeat(50))
        );
        assert_eq!(parse_decimal_integer(&"9".repeat(90)), None);
    }

    #[test]
    fn test_json_values() {
        assert_eq!(value_to_u256(&json!(15)), Some(u(15)));
        assert_eq!(value_to_u256(&json!("15")), Some(u(15)));
        assert_eq!(value_to_u256(&json!("0x0f")), Some(u(15)));
        assert_eq!(value_to_u256(&json!(-1)), None);
        assert_eq!(value_to_u256(&json!(null)), None);
        assert_eq!(value_to_u8(&json!("6")), Some(6));
        assert_eq!(value_to_u8(&json!(300)), None);
    }
}
