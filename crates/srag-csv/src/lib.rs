//! SIVEP-Gripe CSV extract reader and transformer.
//!
//! Converts semicolon-delimited surveillance rows into [`srag_core`] case
//! records. Pure synchronous; no HTTP or database dependencies.
//!
//! # Quick start
//!
//! ```no_run
//! let rows = srag_csv::open("data/srag_sample.csv").unwrap();
//! let cases: Vec<_> = srag_csv::transform(rows.filter_map(Result::ok)).collect();
//! println!("{} usable cases", cases.len());
//! ```

pub mod error;
pub mod fields;
mod reader;
mod sample;
mod transform;

use std::collections::HashMap;

pub use error::{Error, Result};
pub use reader::{RowIter, count_rows, open, read_rows};
pub use sample::{SAMPLE_STATES, sample_rows};
pub use transform::{parse_date, parse_flag, transform, transform_row};

/// One raw extract row: field code (e.g. `DT_NOTIFIC`) to its string value.
pub type RawRow = HashMap<String, String>;
