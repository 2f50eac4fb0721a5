/// Data layer: the stateless CSV core.
///
/// Architecture:
/// ```text
///   raw bytes
///       │
///       ▼
///   ┌──────────┐
///   │  loader  │  decode (utf-8 → latin-1) + parse → Table
///   └──────────┘
///       │
///       ▼
///   ┌──────────┐     ┌──────────┐     ┌──────────┐
///   │  select  │     │  filter  │     │  split   │  Table → Table(s)
///   └──────────┘     └──────────┘     └──────────┘
///       │                 │                │
///       ▼                 ▼                ▼
///   ┌──────────┐     ┌──────────┐
///   │  concat  │     │  export  │  Tables → Table, Table → CSV bytes
///   └──────────┘     └──────────┘
/// ```
pub mod concat;
pub mod error;
pub mod export;
pub mod filter;
pub mod loader;
pub mod model;
pub mod select;
pub mod split;

pub use concat::concat;
pub use error::{ConcatError, ExportError, FilterError, LoadError, SelectError};
pub use export::{to_csv_bytes, write_chunks, write_csv};
pub use filter::{filter, selection_mask, FilterOp, FilterSpec};
pub use loader::{load, load_path, load_with_report, Encoding, LoadOptions, LoadReport};
pub use model::{ColumnKind, Table};
pub use select::select_columns;
pub use split::split;
