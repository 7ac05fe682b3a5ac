//! Display strings for report cells. None of these values feed back into arithmetic.

/// `1234567.8` → `"1,234,568"`.
pub fn thousands(value: f64) -> String {
    grouped(value, 0)
}

/// `1234567.891` → `"1,234,567.89"`.
pub fn thousands_2dp(value: f64) -> String {
    grouped(value, 2)
}

/// `12.345` → `"12.35%"`.
pub fn percent(value: f64) -> String {
    format!("{value:.2}%")
}

/// `1234.5` → `"$1,234.50"`. Zero, negative and non-finite prices all render as `"$0.00"`.
pub fn currency(value: f64) -> String {
    if value.is_finite() && value > 0.0 {
        format!("${}", grouped(value, 2))
    } else {
        "$0.00".to_string()
    }
}

fn grouped(value: f64, decimals: usize) -> String {
    if !value.is_finite() {
        return value.to_string();
    }

    let rendered = format!("{:.*}", decimals, value.abs());
    let (integer, fraction) = match rendered.split_once('.') {
        Some((integer, fraction)) => (integer, Some(fraction)),
        None => (rendered.as_str(), None),
    };

    let mut out = String::with_capacity(rendered.len() + integer.len() / 3 + 1);
    // "-0" is not a useful thing to show in a sales table.
    if value.is_sign_negative() && rendered.chars().any(|ch| ch.is_ascii_digit() && ch != '0') {
        out.push('-');
    }
    for (idx, digit) in integer.chars().enumerate() {
        if idx > 0 && (integer.len() - idx) % 3 == 0 {
            out.push(',');
        }
        out.push(digit);
    }
    if let Some(fraction) = fraction {
        out.push('.');
        out.push_str(fraction);
    }
    out
}
