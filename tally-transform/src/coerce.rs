use serde_json::Value;

/// Coerce an optional JSON value to a number the way a unary plus would.
///
/// A missing value coerces to NaN so that absent fields never look like data.
pub fn to_number(value: Option<&Value>) -> f64 {
    match value {
        None => f64::NAN,
        Some(Value::Null) => 0.0,
        Some(Value::Bool(b)) => {
            if *b {
                1.0
            } else {
                0.0
            }
        }
        Some(Value::Number(n)) => n.as_f64().unwrap_or(f64::NAN),
        Some(Value::String(s)) => parse_numeric_str(s),
        Some(Value::Array(_)) | Some(Value::Object(_)) => f64::NAN,
    }
}

/// Textual form of a value, used when counting decimal places.
///
/// Numbers render in their shortest round-trip form without a trailing `.0`
/// or an exponent, so `2.0` reads as `"2"` and `1e-5` as `"0.00001"`.
/// Strings are kept verbatim.
pub fn to_text(value: Option<&Value>) -> String {
    match value {
        None => "undefined".to_string(),
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => match n.as_f64() {
            Some(f) if n.is_f64() => format!("{f}"),
            _ => n.to_string(),
        },
        Some(other) => other.to_string(),
    }
}

fn parse_numeric_str(s: &str) -> f64 {
    let s = s.trim();
    if s.is_empty() {
        return 0.0;
    }

    match s {
        "Infinity" | "+Infinity" => return f64::INFINITY,
        "-Infinity" => return f64::NEG_INFINITY,
        _ => {}
    }

    if let Some(radix_value) = parse_radix_literal(s) {
        return radix_value;
    }

    // Rust accepts "inf" and "nan" spellings that should not count as numbers here
    if s
        .chars()
        .any(|c| c.is_ascii_alphabetic() && c != 'e' && c != 'E')
    {
        return f64::NAN;
    }

    s.parse::<f64>().unwrap_or(f64::NAN)
}

fn parse_radix_literal(s: &str) -> Option<f64> {
    let prefix = s.get(..2)?;
    let radix = match prefix {
        "0x" | "0X" => 16,
        "0o" | "0O" => 8,
        "0b" | "0B" => 2,
        _ => return None,
    };

    let digits = &s[2..];
    if digits.is_empty() {
        return Some(f64::NAN);
    }
    Some(
        u64::from_str_radix(digits, radix)
            .map(|v| v as f64)
            .unwrap_or(f64::NAN),
    )
}
