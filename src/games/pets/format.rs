//! Compact number display for balances and costs.

/// Short-scale suffixes, one per power of 1000.
const SUFFIXES: [&str; 36] = [
    "", "k", "Mln", "Mld", "Bln", "Bld", "Trn", "Trd", "Kw", "Kwd", "Kn", "Knd", "Sx", "Sxd", "Sp",
    "Spd", "Oc", "Ocd", "No", "Nod", "Dc", "Dcd", "Ud", "Udd", "Dd", "Ddd", "Td", "Tdd", "Qd",
    "Qdd", "Qn", "Qnd", "Sd", "Sdd", "St", "Std",
];

/// Format a number for display: "1.5k", "2.25Mln", "999".
/// Infinite or NaN values show as "∞". Beyond the suffix table,
/// scientific notation with two decimals.
pub fn format_number(n: f64) -> String {
    if n.is_nan() || n.is_infinite() {
        return "∞".to_string();
    }
    if n < 1000.0 {
        return format!("{}", n.floor());
    }

    let exponent = n.log10().floor() as usize;
    let index = exponent / 3;
    if index < SUFFIXES.len() {
        let mantissa = n / 10f64.powi(index as i32 * 3);
        return format!("{}{}", trim_decimals(&format!("{:.2}", mantissa)), SUFFIXES[index]);
    }

    // "1.23e120" -> "1.23e+120"
    let sci = format!("{:.2e}", n);
    match sci.split_once('e') {
        Some((m, e)) if !e.starts_with('-') => format!("{}e+{}", m, e),
        _ => sci,
    }
}

fn trim_decimals(s: &str) -> &str {
    if s.contains('.') {
        s.trim_end_matches('0').trim_end_matches('.')
    } else {
        s
    }
}
