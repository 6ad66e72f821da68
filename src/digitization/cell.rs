// src/digitization/cell.rs

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Cells below this confidence get the review highlight. Strict `<`.
pub const LOW_CONFIDENCE_THRESHOLD: f64 = 0.85;

/// Confidence given to cells the user fills in by hand.
pub const USER_ENTERED_CONFIDENCE: f64 = 1.0;

/// Row label exactly as the OCR service sent it.
///
/// The service has used several formats over time (`0`, `"3"`, `"Fila 4"`), so the
/// label is kept verbatim and only interpreted by [`super::row_label::parse_row_label`].
/// Anything that is neither an integer nor a string lands in `Unrecognized` and is
/// written back unchanged. A cell sent without any label gets `Unrecognized(null)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RowLabel {
    Integer(i64),
    Text(String),
    Unrecognized(Value),
}

impl Default for RowLabel {
    fn default() -> Self {
        RowLabel::Unrecognized(Value::Null)
    }
}

impl RowLabel {
    /// Text used in log lines and the review table tooltip.
    pub fn display(&self) -> String {
        match self {
            RowLabel::Integer(n) => n.to_string(),
            RowLabel::Text(s) => s.clone(),
            RowLabel::Unrecognized(v) => v.to_string(),
        }
    }
}

/// One OCR-extracted (or user-entered) value of the survey grid.
///
/// Every field is optional on the wire. A cell missing its row label or column
/// still decodes; it just never lands in the grid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cell {
    #[serde(rename = "fila", alias = "row", default)]
    pub row_label: RowLabel,
    /// Column index. `"4"` and `4` both decode to 4 and are written back as the
    /// number; missing or unusable columns are -1.
    #[serde(
        rename = "col",
        alias = "column",
        default = "missing_column",
        deserialize_with = "lenient_column"
    )]
    pub column: i64,
    #[serde(rename = "valor", alias = "value", default, deserialize_with = "text_or_number")]
    pub value: String,
    #[serde(rename = "confianza", alias = "confidence", default, deserialize_with = "lenient_confidence")]
    pub confidence: f64,
    #[serde(rename = "ref_id", alias = "reference_id", default, skip_serializing_if = "Option::is_none")]
    pub reference_id: Option<String>,
}

impl Cell {
    /// A cell the OCR engine never detected, typed in by the reviewer.
    pub fn user_entered(row: usize, column: usize, value: String) -> Self {
        Self {
            row_label: RowLabel::Integer(row as i64),
            column: column as i64,
            value,
            confidence: USER_ENTERED_CONFIDENCE,
            reference_id: None,
        }
    }

    pub fn is_low_confidence(&self) -> bool {
        is_low_confidence(self.confidence)
    }

    /// Reference id or the empty string, the form the feedback endpoint expects.
    pub fn reference_id_or_empty(&self) -> &str {
        self.reference_id.as_deref().unwrap_or("")
    }
}

pub fn is_low_confidence(confidence: f64) -> bool {
    confidence < LOW_CONFIDENCE_THRESHOLD
}

fn text_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => s,
        Value::Null => String::new(),
        Value::Number(n) => n.to_string(),
        other => other.to_string(),
    })
}

// Unusable columns become -1, which no grid position matches.
const NO_COLUMN: i64 = -1;

fn missing_column() -> i64 {
    NO_COLUMN
}

fn lenient_column<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Number(n) => n.as_i64().unwrap_or(NO_COLUMN),
        Value::String(s) => s.trim().parse().unwrap_or(NO_COLUMN),
        _ => NO_COLUMN,
    })
}

fn lenient_confidence<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Number(n) => n.as_f64().unwrap_or(0.0),
        Value::String(s) => s.trim().parse().unwrap_or(0.0),
        _ => 0.0,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn threshold_is_strict() {
        assert!(!is_low_confidence(0.85));
        assert!(is_low_confidence(0.84999));
        assert!(!is_low_confidence(1.0));
    }

    #[test]
    fn deserializes_wire_cell_with_every_label_format() {
        let cells: Vec<Cell> = serde_json::from_value(json!([
            { "fila": "Fila 1", "col": 0, "valor": "12", "confianza": 0.93, "ref_id": "R0_C0" },
            { "fila": 2, "col": 1, "valor": 7, "confianza": 0.5 },
            { "fila": "3", "col": "4", "valor": "X" },
            { "fila": [1], "col": 2, "valor": null, "confianza": "bad" }
        ]))
        .unwrap();

        assert_eq!(cells[0].row_label, RowLabel::Text("Fila 1".into()));
        assert_eq!(cells[0].reference_id.as_deref(), Some("R0_C0"));
        assert_eq!(cells[1].row_label, RowLabel::Integer(2));
        assert_eq!(cells[1].value, "7");
        assert_eq!(cells[1].reference_id_or_empty(), "");
        assert_eq!(cells[2].column, 4);
        assert_eq!(cells[2].confidence, 0.0);
        assert!(matches!(cells[3].row_label, RowLabel::Unrecognized(_)));
        assert_eq!(cells[3].value, "");
        assert_eq!(cells[3].confidence, 0.0);
    }

    #[test]
    fn serializes_back_with_original_label_and_without_missing_ref() {
        let cell = Cell {
            row_label: RowLabel::Text("Fila 2".into()),
            column: 3,
            value: "5".into(),
            confidence: 0.7,
            reference_id: None,
        };
        let v = serde_json::to_value(&cell).unwrap();
        assert_eq!(v, json!({ "fila": "Fila 2", "col": 3, "valor": "5", "confianza": 0.7 }));
    }

    #[test]
    fn cell_without_label_or_column_still_decodes() {
        let cells: Vec<Cell> = serde_json::from_value(json!([
            { "valor": "3", "confianza": 0.9, "ref_id": "R9" },
            { "fila": 1, "valor": "4" },
            { "col": 2, "valor": "5" }
        ]))
        .unwrap();

        assert_eq!(cells.len(), 3);
        assert_eq!(cells[0].row_label, RowLabel::Unrecognized(Value::Null));
        assert_eq!(cells[0].column, -1);
        assert_eq!(cells[0].reference_id.as_deref(), Some("R9"));
        assert_eq!(cells[1].row_label, RowLabel::Integer(1));
        assert_eq!(cells[1].column, -1);
        assert_eq!(cells[2].row_label, RowLabel::Unrecognized(Value::Null));
        assert_eq!(cells[2].column, 2);

        let v = serde_json::to_value(&cells[0]).unwrap();
        assert_eq!(
            v,
            json!({ "fila": null, "col": -1, "valor": "3", "confianza": 0.9, "ref_id": "R9" })
        );
    }

    #[test]
    fn string_column_is_written_back_as_a_number() {
        let cell: Cell =
            serde_json::from_value(json!({ "fila": "Fila 1", "col": " 4 ", "valor": "2" })).unwrap();
        assert_eq!(cell.column, 4);
        let v = serde_json::to_value(&cell).unwrap();
        assert_eq!(v["col"], json!(4));
    }

    #[test]
    fn user_entered_cell_is_fully_confident_without_reference() {
        let cell = Cell::user_entered(3, 1, "9".into());
        assert_eq!(cell.row_label, RowLabel::Integer(3));
        assert_eq!(cell.column, 1);
        assert_eq!(cell.confidence, 1.0);
        assert!(cell.reference_id.is_none());
        assert!(!cell.is_low_confidence());
    }
}
