//! Display text for each kind of cell value.

use chrono::{NaiveDate, TimeDelta};

use crate::types::{concat_runs, CellValue};

/// Serial number of 1970-01-01 in the 1900 date system
const UNIX_EPOCH_SERIAL: f64 = 25569.0;

/// Resolve the text a cell shows.
pub fn display_text(value: &CellValue) -> String {
    match value {
        CellValue::Empty => String::new(),
        CellValue::String(s) => s.clone(),
        CellValue::Numeric {
            value,
            date_like: true,
        } => serial_to_date(*value)
            .map_or_else(|| format_number(*value), |d| d.format("%-m月%-d日").to_string()),
        CellValue::Numeric { value, .. } => format_number(*value),
        CellValue::DateSerial(serial) => serial_to_date(*serial)
            .map_or_else(|| format_number(*serial), |d| d.format("%Y/%m/%d").to_string()),
        CellValue::Hyperlink { .. } => value.hyperlink_text().unwrap_or_default(),
        CellValue::RichText(runs) => concat_runs(runs),
    }
}

/// Calendar date of a day serial: whole days since 1970-01-01, UTC.
pub fn serial_to_date(serial: f64) -> Option<NaiveDate> {
    let days = (serial - UNIX_EPOCH_SERIAL).floor();
    // Out-of-range serials have no calendar date.
    if !days.is_finite() || days.abs() > 1.0e8 {
        return None;
    }
    #[allow(clippy::cast_possible_truncation)]
    let days = days as i64;
    let epoch = NaiveDate::from_ymd_opt(1970, 1, 1)?;
    epoch.checked_add_signed(TimeDelta::try_days(days)?)
}

/// Plain number formatting: integers without a fraction, everything else in
/// shortest round-trip form.
pub fn format_number(value: f64) -> String {
    if value.is_nan() {
        "NaN".to_string()
    } else if value.is_infinite() {
        if value > 0.0 { "Infinity" } else { "-Infinity" }.to_string()
    } else if value == 0.0 {
        "0".to_string()
    } else {
        value.to_string()
    }
}
