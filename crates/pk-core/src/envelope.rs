//! API response envelopes: `{success, data, ...}`.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

use crate::analysis::{AnalysisKind, AnalysisResult};
use crate::{Error, Result};

/// Generic `{success, data}` envelope used by the dataset endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub success: bool,
    #[serde(default)]
    pub data: Option<T>,
    #[serde(default)]
    pub message: Option<String>,
}

impl<T: Default> Envelope<T> {
    /// Unwrap the payload. `failure` is the message used when the server sets
    /// `success: false` without a message of its own; a successful envelope
    /// without `data` yields an empty payload.
    pub fn into_data_or_default(self, failure: &str) -> Result<T> {
        if !self.success {
            return Err(Error::Envelope(self.message.unwrap_or_else(|| failure.to_string())));
        }
        Ok(self.data.unwrap_or_default())
    }
}

/// Envelope of `GET /api/analysis/{id}/plot-data`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisEnvelope {
    pub success: bool,
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub data: Option<serde_json::Value>,
    #[serde(default)]
    pub parameters: Option<serde_json::Value>,
    #[serde(default)]
    pub message: Option<String>,
}

/// Outcome of decoding an analysis envelope.
#[derive(Debug, Clone, PartialEq)]
pub enum DecodedAnalysis {
    Supported(AnalysisResult),
    /// The `type` string names an analysis the renderer has no charts for.
    Unsupported(String),
}

impl AnalysisEnvelope {
    pub fn decode(self, failure: &str) -> Result<DecodedAnalysis> {
        if !self.success {
            return Err(Error::Envelope(self.message.unwrap_or_else(|| failure.to_string())));
        }
        let kind = self.kind.unwrap_or_default();
        let Some(parsed) = AnalysisKind::parse(&kind) else {
            return Ok(DecodedAnalysis::Unsupported(kind));
        };
        let data = self.data.ok_or_else(|| Error::Validation("envelope has no data".into()))?;
        Ok(DecodedAnalysis::Supported(AnalysisResult::decode(parsed, data)?))
    }
}

/// Row of `GET /api/dataset/{id}/preview`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PreviewRow {
    #[serde(deserialize_with = "subject_id")]
    pub subject_id: String,
    pub time: f64,
    pub concentration: f64,
}

/// Row of `GET /api/dataset/{id}/plot-data`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetProfile {
    #[serde(deserialize_with = "subject_id")]
    pub subject_id: String,
    pub times: Vec<f64>,
    pub concentrations: Vec<f64>,
}

/// Subject ids come from spreadsheet columns and may be numbers or strings.
fn subject_id<'de, D: Deserializer<'de>>(deserializer: D) -> std::result::Result<String, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Text(String),
        Int(i64),
        Float(f64),
    }

    impl fmt::Display for RawId {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            match self {
                RawId::Text(s) => f.write_str(s),
                RawId::Int(i) => write!(f, "{i}"),
                RawId::Float(x) => write!(f, "{x}"),
            }
        }
    }

    Ok(RawId::deserialize(deserializer)?.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn missing_data_defaults_to_empty() {
        let env: Envelope<Vec<PreviewRow>> = serde_json::from_value(json!({"success": true})).unwrap();
        assert!(env.into_data_or_default("Error loading dataset preview").unwrap().is_empty());
        let env: Envelope<Vec<PreviewRow>> =
            serde_json::from_value(json!({"success": false, "message": "Dataset not found"})).unwrap();
        let err = env.into_data_or_default("Error loading dataset preview").unwrap_err();
        assert!(matches!(err, Error::Envelope(ref m) if m == "Dataset not found"));
    }

    #[test]
    fn failed_envelope_uses_fallback_message() {
        let env: Envelope<Vec<PreviewRow>> = serde_json::from_value(json!({"success": false})).unwrap();
        let err = env.into_data_or_default("Error loading dataset preview").unwrap_err();
        assert!(matches!(err, Error::Envelope(ref m) if m == "Error loading dataset preview"));
    }

    #[test]
    fn preview_rows_accept_numeric_subject_ids() {
        let env: Envelope<Vec<PreviewRow>> = serde_json::from_value(json!({
            "success": true,
            "data": [{"subject_id": 101, "time": 0.5, "concentration": 1.2},
                     {"subject_id": "S2", "time": 1, "concentration": 3}]
        }))
        .unwrap();
        let rows = env.into_data_or_default("x").unwrap();
        assert_eq!(rows[0].subject_id, "101");
        assert_eq!(rows[1].subject_id, "S2");
    }

    #[test]
    fn unknown_analysis_type_is_unsupported_not_error() {
        let env: AnalysisEnvelope = serde_json::from_value(json!({
            "success": true, "type": "DataProcessing", "data": {}
        }))
        .unwrap();
        assert_eq!(env.decode("x").unwrap(), DecodedAnalysis::Unsupported("DataProcessing".into()));
    }

    #[test]
    fn known_analysis_type_decodes() {
        let env: AnalysisEnvelope = serde_json::from_value(json!({
            "success": true, "type": "Bioequivalence",
            "data": {"cmax": {"ratio": 101.0, "ci_lower": 95.0, "ci_upper": 108.0, "is_bioequivalent": true}},
            "parameters": {"design": "crossover"}
        }))
        .unwrap();
        match env.decode("x").unwrap() {
            DecodedAnalysis::Supported(r) => assert_eq!(r.kind(), AnalysisKind::Bioequivalence),
            other => panic!("unexpected {other:?}"),
        }
    }
}
