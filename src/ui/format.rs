//! pt-BR display formatting.

use chrono::{DateTime, FixedOffset, Offset, Utc};

/// Placeholder shown for absent values.
pub const DASH: &str = "-";

/// The clinic's wall-clock offset (UTC-03:00, Brasília).
pub fn clinic_offset() -> FixedOffset {
    FixedOffset::west_opt(3 * 3600).unwrap_or_else(|| Utc.fix())
}

/// `dd/mm/aaaa, HH:MM` in `offset`.
pub fn date_time_br(value: &DateTime<Utc>, offset: FixedOffset) -> String {
    value.with_timezone(&offset).format("%d/%m/%Y, %H:%M").to_string()
}

/// Brazilian real: `R$ 1.234,56` with a no-break space after the symbol, `-` when absent.
pub fn currency_brl(value: Option<f64>) -> String {
    let Some(v) = value.filter(|v| v.is_finite()) else {
        return DASH.to_string();
    };
    let cents = (v.abs() * 100.0).round() as u64;
    let units = (cents / 100).to_string();
    let mut grouped = String::with_capacity(units.len() + units.len() / 3);
    for (i, ch) in units.chars().enumerate() {
        if i > 0 && (units.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(ch);
    }
    let sign = if v < 0.0 && cents > 0 { "-" } else { "" };
    format!("{}R$\u{a0}{},{:02}", sign, grouped, cents % 100)
}

/// The text, or `-` when absent or blank.
pub fn or_dash(value: Option<&str>) -> &str {
    value.filter(|s| !s.trim().is_empty()).unwrap_or(DASH)
}
