//! Reasons a builder declines to produce a chart.

use std::fmt;

use pk_core::SubjectMap;
use serde::{Deserialize, Serialize};

/// Why a slot was left untouched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum SkipReason {
    /// Required arrays absent from a subject record.
    MissingFields { subject: String, fields: Vec<String> },
    /// `x` and `y` sequences of a profile differ in length.
    LengthMismatch { subject: String, x_len: usize, y_len: usize },
    /// Nothing left to plot after filtering.
    NoData,
    /// The requested subject is not in the payload.
    UnknownSubject { subject: String },
}

impl SkipReason {
    pub fn missing(subject: &str, fields: &[&str]) -> Self {
        Self::MissingFields {
            subject: subject.to_string(),
            fields: fields.iter().map(|f| f.to_string()).collect(),
        }
    }
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingFields { subject, fields } => {
                write!(f, "subject {subject} is missing {}", fields.join(", "))
            }
            Self::LengthMismatch { subject, x_len, y_len } => {
                write!(f, "subject {subject} has {x_len} x values but {y_len} y values")
            }
            Self::NoData => f.write_str("no data to plot"),
            Self::UnknownSubject { subject } => write!(f, "subject {subject} not found"),
        }
    }
}

/// Builder output: a chart, or the reason there is none.
pub type Built = Result<crate::spec::ChartSpec, SkipReason>;

/// Resolve the selected subject, defaulting to the first one.
pub(crate) fn select_subject<'a, T>(
    map: &'a SubjectMap<T>,
    selected: Option<&str>,
) -> Result<(&'a str, &'a T), SkipReason> {
    if map.is_empty() {
        return Err(SkipReason::NoData);
    }
    map.select(selected).ok_or_else(|| SkipReason::UnknownSubject {
        subject: selected.unwrap_or_default().to_string(),
    })
}

/// Reject index-misaligned sequences.
pub(crate) fn check_aligned(subject: &str, x_len: usize, y_len: usize) -> Result<(), SkipReason> {
    if x_len == y_len {
        Ok(())
    } else {
        Err(SkipReason::LengthMismatch { subject: subject.to_string(), x_len, y_len })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_with_reason_tag() {
        let v = serde_json::to_value(SkipReason::missing("S2", &["predicted_concentrations"])).unwrap();
        assert_eq!(v["reason"], "missing_fields");
        assert_eq!(v["subject"], "S2");
        assert_eq!(v["fields"][0], "predicted_concentrations");
        assert_eq!(serde_json::to_value(SkipReason::NoData).unwrap()["reason"], "no_data");
    }

    #[test]
    fn select_reports_unknown_and_empty() {
        let mut map = SubjectMap::new();
        assert_eq!(select_subject::<u8>(&map, None), Err(SkipReason::NoData));
        map.insert("A", 1u8);
        assert_eq!(select_subject(&map, None).unwrap(), ("A", &1));
        assert!(matches!(select_subject(&map, Some("Z")), Err(SkipReason::UnknownSubject { .. })));
    }

    #[test]
    fn display_is_readable() {
        let r = SkipReason::LengthMismatch { subject: "S1".into(), x_len: 3, y_len: 2 };
        assert_eq!(r.to_string(), "subject S1 has 3 x values but 2 y values");
    }
}
