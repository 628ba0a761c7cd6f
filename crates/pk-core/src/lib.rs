//! # pk-core
//!
//! Error type and the typed data model of the PK analysis server's JSON
//! responses (NCA, compartmental, bioequivalence, statistics).

#![warn(clippy::all)]

pub mod analysis;
pub mod envelope;
pub mod error;
pub mod subject_map;
pub mod types;

pub use analysis::{
    AnalysisKind, AnalysisResult, RegressionResults, StatisticsResult, StatisticsView, TimeResults,
    TimeTest,
};
pub use envelope::{AnalysisEnvelope, DatasetProfile, DecodedAnalysis, Envelope, PreviewRow};
pub use error::{Error, Result};
pub use subject_map::{SUMMARY_KEY, SubjectMap};
pub use types::*;

/// Crate version, reported by the CLI.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
