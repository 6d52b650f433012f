//! Reading input documents and writing output tables.

pub mod pdf;
pub use pdf::{ExtractionError, Source, load_text};

pub mod table;
pub use table::{WriteError, encode_csv, encode_json, write_output};
