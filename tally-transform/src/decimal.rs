use lazy_static::lazy_static;
use regex::Regex;

/// Upper bound on decimal places; fixed-point formatters reject larger precisions
pub const MAX_DECIMAL_PLACES: u32 = 20;

// Digits rendered past the requested precision. Every finite double has at most
// 1074 fractional digits, so this renders the exact value with no rounding.
const EXACT_DIGITS: usize = 1075;

lazy_static! {
    static ref DECIMAL_SUFFIX: Regex =
        Regex::new(r"(?:\.([0-9]+))?(?:[eE]([+-]?[0-9]+))?$").expect("valid decimal pattern");
}

/// Number of digits after the decimal point in a numeric literal.
///
/// Exponents shift the count, so `"1.5e-3"` has 4 places and `"12e5"` has none.
pub fn decimal_places(text: &str) -> u32 {
    let Some(captures) = DECIMAL_SUFFIX.captures(text) else {
        return 0;
    };

    let fraction_digits = captures.get(1).map(|m| m.as_str().len()).unwrap_or(0) as i64;
    let exponent = captures
        .get(2)
        .map(|m| parse_exponent(m.as_str()))
        .unwrap_or(0);

    let places = fraction_digits.saturating_sub(exponent).max(0);
    u32::try_from(places).unwrap_or(u32::MAX)
}

fn parse_exponent(s: &str) -> i64 {
    s.parse::<i64>().unwrap_or_else(|_| {
        if s.starts_with('-') {
            i64::MIN
        } else {
            i64::MAX
        }
    })
}

/// Render `x` with exactly `digits` fractional digits.
///
/// Rounding works on the exact binary value of `x` and breaks ties away from
/// zero, so `4.5` renders as `"5"` and `1.005` (stored below the midpoint) as `"1.00"`.
pub fn to_fixed(x: f64, digits: u32) -> String {
    if x.is_nan() {
        return "NaN".to_string();
    }
    if x.is_infinite() {
        return if x > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }
    if x.abs() >= 1e21 {
        return format!("{x}");
    }

    let digits = digits as usize;
    let exact = format!("{:.*}", digits + EXACT_DIGITS, x.abs());
    let (kept, rest) = exact.split_at(exact.len() - EXACT_DIGITS);
    let kept = kept.strip_suffix('.').unwrap_or(kept);

    let mut out = kept.as_bytes().to_vec();
    if rest.as_bytes().first().is_some_and(|d| *d >= b'5') {
        increment_decimal(&mut out);
    }

    let mut rendered = String::with_capacity(out.len() + 1);
    if x < 0.0 {
        rendered.push('-');
    }
    rendered.extend(out.into_iter().map(char::from));
    rendered
}

/// Round `x` to `digits` fractional digits using the `to_fixed` rule
pub fn round_to(x: f64, digits: u32) -> f64 {
    let fixed = to_fixed(x, digits);
    match fixed.as_str() {
        "NaN" => f64::NAN,
        "Infinity" => f64::INFINITY,
        "-Infinity" => f64::NEG_INFINITY,
        s => s.parse::<f64>().unwrap_or(f64::NAN),
    }
}

fn increment_decimal(digits: &mut Vec<u8>) {
    for d in digits.iter_mut().rev() {
        match *d {
            b'.' => continue,
            b'9' => *d = b'0',
            _ => {
                *d += 1;
                return;
            }
        }
    }
    // carried past the leading digit
    digits.insert(0, b'1');
}
