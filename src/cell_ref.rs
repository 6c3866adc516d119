//! Utilities for Excel-style cell addresses ("A1", "$B$7", "AA10").

/// Rows in a worksheet; the last valid 0-indexed row is one less.
pub const MAX_ROWS: u32 = 1_048_576;

/// Columns in a worksheet (A..XFD).
pub const MAX_COLS: u32 = 16_384;

/// Parse a cell reference like "A1" into (row, col), both 0-indexed.
pub fn parse_cell_ref(cell_ref: &str) -> Option<(u32, u32)> {
    let mut col: u32 = 0;
    let mut row: u32 = 0;
    let mut saw_col = false;
    let mut saw_row = false;

    for ch in cell_ref.trim().chars() {
        if ch == '$' {
            continue;
        }
        if ch.is_ascii_alphabetic() {
            // Letters after digits are not a valid address.
            if saw_row {
                return None;
            }
            let upper = ch.to_ascii_uppercase();
            col = col.checked_mul(26)?.checked_add(upper as u32 - 'A' as u32 + 1)?;
            saw_col = true;
        } else if ch.is_ascii_digit() {
            row = row.checked_mul(10)?.checked_add(ch as u32 - '0' as u32)?;
            saw_row = true;
        } else {
            return None;
        }
    }

    if !saw_col || !saw_row || row == 0 {
        return None;
    }

    Some((row - 1, col - 1))
}

/// Parse a range like "A1:B10" or "A1" into (start_row, start_col, end_row, end_col).
pub fn parse_cell_range(range: &str) -> Option<(u32, u32, u32, u32)> {
    if let Some((start, end)) = range.split_once(':') {
        let (start_row, start_col) = parse_cell_ref(start)?;
        let (end_row, end_col) = parse_cell_ref(end)?;
        Some((start_row, start_col, end_row, end_col))
    } else {
        let (row, col) = parse_cell_ref(range)?;
        Some((row, col, row, col))
    }
}

/// Convert a 0-based column index to Excel column letters (A, B, ..., Z, AA, AB, ...)
pub fn col_to_letter(col: u32) -> String {
    let mut result = String::new();
    let mut n = u64::from(col) + 1;
    while n > 0 {
        n -= 1;
        // n % 26 < 26, always fits in a u8
        #[allow(clippy::cast_possible_truncation)]
        let c = char::from(b'A' + (n % 26) as u8);
        result.insert(0, c);
        n /= 26;
    }
    result
}

/// Format a 0-based (row, col) pair as an A1 address.
pub fn format_address(row: u32, col: u32) -> String {
    format!("{}{}", col_to_letter(col), u64::from(row) + 1)
}
