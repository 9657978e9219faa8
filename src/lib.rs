//! Column type inference for uploaded CSV and spreadsheet files.
//!
//! An upload is parsed into a raw table, every column is run through an
//! ordered battery of heuristics to pick a type (boolean, integer, float,
//! complex, datetime, category or string), and the typed rows are stored as
//! JSON under a fresh identifier.

pub mod app;
pub mod config;
pub mod data;
pub mod error;
pub mod record;
pub mod service;
pub mod state;
pub mod store;

pub use data::classify::InferenceOptions;
pub use data::model::{DType, RawTable, TypedColumn, TypedTable};
pub use error::AnalysisError;
pub use service::Analyzer;
