//! Cleaning and summarising concert-tour sheets.
//!
//! Rows are read from the tour CSV ([`load`]), normalized into typed
//! records with a derived cost per ticket ([`process::normalize`]), and
//! summarised per tour selection ([`report`]). The cleaned table can be
//! exported to Parquet ([`export`]).

pub mod config;
pub mod error;
pub mod export;
pub mod load;
pub mod process;
pub mod report;

pub use error::{Error, Result};
pub use load::RawRecord;
pub use process::{normalize, CleanRecord};
pub use report::{TourDataset, TourFilter};
