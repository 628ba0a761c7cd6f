//! # pk-client
//!
//! Async HTTP access to the PK analysis server and loaders that fetch a
//! payload and render it into a shared [`pk_viz::Page`].

#![warn(clippy::all)]

pub mod client;
pub mod error;
pub mod loader;

pub use client::ApiClient;
pub use error::{ClientError, Result};
pub use loader::{SharedPage, load_analysis, load_dataset, load_dataset_plot, load_dataset_preview, shared_page};
