//! Source loading for the VR engine.
//!
//! The ten monthly HR extracts arrive as spreadsheets, loose in a directory
//! or packed in a zip archive. This module reads them into [`Table`]s, keeps
//! the current set in a [`SourceRegistry`], and extracts the typed records
//! the calculation stages consume.

mod archive;
pub mod extract;
mod reader;
mod registry;
mod table;

pub use archive::{ExtractedArchive, is_archive, locate_source_file};
pub use extract::{
    EXPATRIATE_ID_COLUMN, ID_COLUMN, RateTable, UnionCalendar, id_set, roster, state_rates,
    union_calendar,
};
pub use reader::{read_table, serial_to_datetime};
pub use registry::{LoadSummary, SourceKind, SourceRegistry, SourceStore};
pub use table::{Cell, Table};
