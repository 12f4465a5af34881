//! Display formatting for durations and dollar amounts.
//!
//! Two duration flavors: [`format_ci_time`] for aggregate stats (keeps a
//! sign and sub-second precision) and [`format_card_time`] for compact
//! per-commit labels.

/// Format an aggregate CI duration in milliseconds, e.g. `"4.2 s"`,
/// `"3m 15s"`, `"2h 40m"`. Negative inputs keep their sign.
pub fn format_ci_time(ms: f64) -> String {
    let sign = if ms < 0.0 { "-" } else { "" };
    let s = ms.abs() / 1000.0;
    if s < 60.0 {
        return format!("{sign}{s:.1} s");
    }
    let total_min = s / 60.0;
    if total_min < 60.0 {
        let m = total_min.floor() as u64;
        let rem = (s % 60.0).round() as u64;
        return if rem > 0 {
            format!("{sign}{m}m {rem}s")
        } else {
            format!("{sign}{m} m")
        };
    }
    let h = (total_min / 60.0).floor() as u64;
    let rem_min = (total_min % 60.0).round() as u64;
    if rem_min > 0 {
        format!("{sign}{h}h {rem_min}m")
    } else {
        format!("{sign}{h} h")
    }
}

/// Compact duration for per-commit labels, e.g. `"45s"`, `"12.5m"`,
/// `"1h 20m"`. Whole minutes drop the decimal (`"15m"`, not `"15.0m"`).
pub fn format_card_time(ms: f64) -> String {
    let s = ms / 1000.0;
    if s < 60.0 {
        return format!("{:.0}s", s);
    }
    let m = s / 60.0;
    if m < 60.0 {
        let text = format!("{m:.1}");
        let text = text.strip_suffix(".0").unwrap_or(&text);
        return format!("{text}m");
    }
    let h = (m / 60.0).floor() as u64;
    let rem = (m % 60.0).round() as u64;
    if rem > 0 {
        format!("{h}h {rem}m")
    } else {
        format!("{h}h")
    }
}

/// Format a dollar amount with precision scaled to magnitude and
/// thousands separators above $1000.
pub fn format_cost(dollars: f64) -> String {
    if dollars < 0.01 && dollars > 0.0 {
        return "< $0.01".to_string();
    }
    if dollars >= 1000.0 {
        return format!("${}", group_thousands(format!("{dollars:.0}")));
    }
    if dollars >= 100.0 {
        return format!("${dollars:.0}");
    }
    if dollars >= 10.0 {
        return format!("${dollars:.1}");
    }
    format!("${dollars:.2}")
}

fn group_thousands(digits: String) -> String {
    let bytes = digits.as_bytes();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, b) in bytes.iter().enumerate() {
        if i > 0 && (bytes.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(*b as char);
    }
    out
}
