// Library exports for the lookup-table generator.

pub mod export;

pub use export::{to_csv, write_csv_file, ExportError};
