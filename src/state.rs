use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use csv_workbench::data::split::{DEFAULT_ROWS_PER_CHUNK, MIN_ROWS_PER_CHUNK};
use csv_workbench::data::{self, FilterOp, FilterSpec, Table};
use csv_workbench::session::Session;

// ---------------------------------------------------------------------------
// Status line
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub enum Status {
    Info(String),
    Error(String),
}

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    /// Loaded table and load metrics.
    pub session: Session,

    /// File name of the loaded CSV, for the title bar.
    pub source_name: Option<String>,

    /// Columns ticked for export, in click order.
    pub selected_columns: Vec<String>,

    /// Advanced filter inputs.
    pub filter_column: String,
    pub filter_op: FilterOp,
    pub filter_value: String,

    /// Rows per file when splitting.
    pub rows_per_chunk: usize,

    /// Last outcome shown in the top bar.
    pub status: Option<Status>,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            session: Session::default(),
            source_name: None,
            selected_columns: Vec::new(),
            filter_column: String::new(),
            filter_op: FilterOp::Gt,
            filter_value: String::new(),
            rows_per_chunk: DEFAULT_ROWS_PER_CHUNK,
            status: None,
        }
    }
}

impl AppState {
    /// Load a CSV file as the working table.
    pub fn open(&mut self, path: &Path) -> Result<()> {
        let bytes =
            std::fs::read(path).with_context(|| format!("reading {}", path.display()))?;
        let table = self.session.replace(&bytes).context("loading CSV")?;

        self.filter_column = table.column_names().into_iter().next().unwrap_or_default();
        self.selected_columns.clear();
        self.source_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned());
        Ok(())
    }

    /// How the current table was read, e.g. `"latin-1, 2 malformed rows skipped"`.
    pub fn load_summary(&self) -> Option<String> {
        let encoding = self.session.encoding()?;
        let skipped = self.session.skipped_rows();
        Some(if skipped > 0 {
            format!("{}, {skipped} malformed rows skipped", encoding.label())
        } else {
            encoding.label().to_string()
        })
    }

    pub fn table(&self) -> Result<&Table> {
        self.session.table().context("no CSV file loaded")
    }

    /// Tick or untick a column for export.
    pub fn toggle_column(&mut self, name: &str) {
        match self.selected_columns.iter().position(|c| c == name) {
            Some(pos) => {
                self.selected_columns.remove(pos);
            }
            None => self.selected_columns.push(name.to_string()),
        }
    }

    /// The loaded table restricted to the ticked columns.
    pub fn column_selection(&self) -> Result<Table> {
        Ok(data::select_columns(self.table()?, &self.selected_columns)?)
    }

    /// The loaded table filtered by the advanced filter inputs.
    pub fn advanced_filter(&self) -> Result<Table> {
        let spec = FilterSpec::new(
            self.filter_column.as_str(),
            self.filter_op,
            self.filter_value.as_str(),
        );
        Ok(data::filter::apply(self.table()?, &spec)?)
    }

    /// Split the loaded table into `part_<n>.csv` files under `dir`.
    pub fn split_into(&self, dir: &Path) -> Result<Vec<PathBuf>> {
        let rows = NonZeroUsize::new(self.rows_per_chunk.max(MIN_ROWS_PER_CHUNK))
            .context("rows per file must be positive")?;
        let chunks = data::split(self.table()?, rows);
        let paths = data::write_chunks(&chunks, dir)
            .with_context(|| format!("writing chunks to {}", dir.display()))?;
        Ok(paths)
    }

    /// Load each file independently and stack them.
    pub fn combine(&self, paths: &[PathBuf]) -> Result<Table> {
        let tables = paths
            .iter()
            .map(|path| {
                data::load_path(path, self.session.options())
                    .map(|report| report.table)
                    .with_context(|| format!("loading {}", path.display()))
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(data::concat(&tables)?)
    }

    /// Back to a blank state.
    pub fn reset(&mut self) {
        *self = Self::default();
        self.set_info("Application reset successfully");
    }

    pub fn set_info(&mut self, msg: impl Into<String>) {
        let msg = msg.into();
        log::info!("{msg}");
        self.status = Some(Status::Info(msg));
    }

    pub fn set_error(&mut self, err: &anyhow::Error) {
        log::error!("{err:#}");
        self.status = Some(Status::Error(format!("Error: {err:#}")));
    }
}

/// Write `table` as CSV to `path`.
pub fn save_table(table: &Table, path: &Path) -> Result<()> {
    data::write_csv(table, path).with_context(|| format!("saving {}", path.display()))
}
