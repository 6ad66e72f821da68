// src/digitization/document.rs
// Upload response of the OCR service, resolved once into `OcrDocument`.

use serde::Deserialize;
use serde_json::Value;

use super::cell::Cell;

/// Which response layout the server used.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentShape {
    /// `{ id, estado, zona_id, resultado_ia: { status, promedio_confianza, matriz } }`
    Current,
    /// Older servers put `matriz` at the top level.
    Legacy,
}

/// Canonical OCR document. The rest of the app never sees the raw shapes.
#[derive(Debug, Clone, PartialEq)]
pub struct OcrDocument {
    pub id: Option<String>,
    pub estado: Option<String>,
    pub zone_id: Option<String>,
    pub ocr_status: Option<String>,
    pub average_confidence: Option<f64>,
    pub cells: Vec<Cell>,
    pub shape: DocumentShape,
}

impl OcrDocument {
    pub fn from_json(body: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str::<RawDocument>(body).map(Into::into)
    }

    /// Mean confidence reported by the server, or computed from the cells.
    pub fn average_confidence_or_computed(&self) -> Option<f64> {
        self.average_confidence.or_else(|| {
            if self.cells.is_empty() {
                None
            } else {
                Some(self.cells.iter().map(|c| c.confidence).sum::<f64>() / self.cells.len() as f64)
            }
        })
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawDocument {
    Current {
        #[serde(default)]
        id: Option<Scalar>,
        #[serde(default)]
        estado: Option<Scalar>,
        #[serde(default)]
        zona_id: Option<Scalar>,
        resultado_ia: RawOcrResult,
    },
    Legacy {
        #[serde(default)]
        id: Option<Scalar>,
        #[serde(default)]
        estado: Option<Scalar>,
        #[serde(default)]
        zona_id: Option<Scalar>,
        #[serde(default)]
        status: Option<Scalar>,
        #[serde(default)]
        promedio_confianza: Option<Value>,
        matriz: Vec<Cell>,
    },
}

#[derive(Deserialize)]
struct RawOcrResult {
    #[serde(default)]
    status: Option<Scalar>,
    #[serde(default)]
    promedio_confianza: Option<Value>,
    #[serde(default)]
    matriz: Vec<Cell>,
}

/// Ids and zones have come back both as numbers and as strings.
#[derive(Deserialize)]
#[serde(untagged)]
enum Scalar {
    Int(i64),
    Text(String),
    Other(Value),
}

impl Scalar {
    fn into_text(self) -> Option<String> {
        match self {
            Scalar::Int(n) => Some(n.to_string()),
            Scalar::Text(s) => Some(s),
            Scalar::Other(Value::Null) => None,
            Scalar::Other(v) => Some(v.to_string()),
        }
    }
}

fn confidence(value: Option<Value>) -> Option<f64> {
    match value? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

impl From<RawDocument> for OcrDocument {
    fn from(raw: RawDocument) -> Self {
        match raw {
            RawDocument::Current { id, estado, zona_id, resultado_ia } => OcrDocument {
                id: id.and_then(Scalar::into_text),
                estado: estado.and_then(Scalar::into_text),
                zone_id: zona_id.and_then(Scalar::into_text),
                ocr_status: resultado_ia.status.and_then(Scalar::into_text),
                average_confidence: confidence(resultado_ia.promedio_confianza),
                cells: resultado_ia.matriz,
                shape: DocumentShape::Current,
            },
            RawDocument::Legacy { id, estado, zona_id, status, promedio_confianza, matriz } => OcrDocument {
                id: id.and_then(Scalar::into_text),
                estado: estado.and_then(Scalar::into_text),
                zone_id: zona_id.and_then(Scalar::into_text),
                ocr_status: status.and_then(Scalar::into_text),
                average_confidence: confidence(promedio_confianza),
                cells: matriz,
                shape: DocumentShape::Legacy,
            },
        }
    }
}
