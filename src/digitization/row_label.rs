// src/digitization/row_label.rs

use serde_json::Value;

use super::cell::RowLabel;

const ROW_WORD: &str = "fila";

/// Zero-based row index for a label, or `None` when the label can't be mapped.
///
/// - integers are already zero-based and are returned untouched (even if out of range)
/// - whole floats such as `1.0` count as integers
/// - `"Fila N"` (any case, optional whitespace before `N`) is one-based: `N - 1`
/// - a bare digit string such as `"3"` is taken as zero-based and NOT decremented
///
/// The last two rules disagree on the base. The backend has sent both forms and
/// the grid has always read them this way, so the asymmetry is kept.
pub fn parse_row_label(label: &RowLabel) -> Option<i64> {
    match label {
        RowLabel::Integer(n) => Some(*n),
        RowLabel::Text(text) => parse_row_text(text),
        RowLabel::Unrecognized(Value::Number(n)) => n.as_f64().and_then(whole_number),
        RowLabel::Unrecognized(_) => None,
    }
}

fn whole_number(f: f64) -> Option<i64> {
    // Bounds keep the cast exact; i64::MAX itself is not representable as f64.
    if f.fract() != 0.0 || !(i64::MIN as f64..i64::MAX as f64).contains(&f) {
        return None;
    }
    Some(f as i64)
}

fn parse_row_text(text: &str) -> Option<i64> {
    let text = text.trim();
    if let Some(n) = parse_digits(text) {
        return Some(n);
    }

    let head = text.get(..ROW_WORD.len())?;
    if !head.eq_ignore_ascii_case(ROW_WORD) {
        return None;
    }
    let number = parse_digits(text[ROW_WORD.len()..].trim_start())?;
    number.checked_sub(1)
}

fn parse_digits(text: &str) -> Option<i64> {
    if text.is_empty() || !text.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    text.parse().ok()
}
