use std::borrow::Cow;
use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use arrow::array::{Array, ArrayRef, Float64Array, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema, SchemaRef};
use arrow::error::ArrowError;
use arrow::record_batch::{RecordBatch, RecordBatchOptions};
use arrow::util::display::array_value_to_string;

// ---------------------------------------------------------------------------
// ColumnKind – the declared type of a column
// ---------------------------------------------------------------------------

/// Declared type of a column, mirroring the Pandas dtypes a CSV infers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    Integer,
    Float,
    Text,
}

impl ColumnKind {
    /// Arrow type backing this kind.
    pub fn data_type(self) -> DataType {
        match self {
            ColumnKind::Integer => DataType::Int64,
            ColumnKind::Float => DataType::Float64,
            ColumnKind::Text => DataType::Utf8,
        }
    }

    /// The kind stored as `data_type`, if it is one a table may hold.
    pub fn of(data_type: &DataType) -> Option<Self> {
        match data_type {
            DataType::Int64 => Some(ColumnKind::Integer),
            DataType::Float64 => Some(ColumnKind::Float),
            DataType::Utf8 => Some(ColumnKind::Text),
            _ => None,
        }
    }

    /// Like [`ColumnKind::of`], reading any other Arrow type as text.
    pub fn from_data_type(data_type: &DataType) -> Self {
        Self::of(data_type).unwrap_or(ColumnKind::Text)
    }

    /// The kind able to hold values of both `self` and `other`.
    pub fn unify(self, other: Self) -> Self {
        use ColumnKind::*;
        match (self, other) {
            (a, b) if a == b => a,
            (Integer, Float) | (Float, Integer) => Float,
            _ => Text,
        }
    }
}

impl fmt::Display for ColumnKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColumnKind::Integer => write!(f, "integer"),
            ColumnKind::Float => write!(f, "float"),
            ColumnKind::Text => write!(f, "text"),
        }
    }
}

// ---------------------------------------------------------------------------
// Table – an immutable, named-column dataset
// ---------------------------------------------------------------------------

/// An in-memory table of uniquely named, typed columns.
///
/// Backed by an Arrow [`RecordBatch`]; a null cell is the missing-value
/// marker. Every operation on a table yields a new table.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    batch: RecordBatch,
}

impl Table {
    /// Build a table from named columns. All arrays must have `num_rows` rows,
    /// names must be unique and every array must be `Int64`, `Float64` or
    /// `Utf8`.
    pub fn from_columns(
        columns: Vec<(String, ArrayRef)>,
        num_rows: usize,
    ) -> Result<Self, ArrowError> {
        let mut seen = HashSet::with_capacity(columns.len());
        for (name, array) in &columns {
            if !seen.insert(name.as_str()) {
                return Err(ArrowError::SchemaError(format!(
                    "duplicate column name: {name}"
                )));
            }
            if ColumnKind::of(array.data_type()).is_none() {
                return Err(ArrowError::InvalidArgumentError(format!(
                    "column {name} has unsupported type {}",
                    array.data_type()
                )));
            }
        }

        let fields: Vec<Field> = columns
            .iter()
            .map(|(name, array)| Field::new(name.clone(), array.data_type().clone(), true))
            .collect();
        let arrays = columns.into_iter().map(|(_, array)| array).collect();
        let batch = RecordBatch::try_new_with_options(
            Arc::new(Schema::new(fields)),
            arrays,
            &RecordBatchOptions::new().with_row_count(Some(num_rows)),
        )?;
        Ok(Table { batch })
    }

    pub(crate) fn from_batch(batch: RecordBatch) -> Self {
        Table { batch }
    }

    /// Schema with one nullable field per `(name, kind)` pair.
    pub(crate) fn schema_for(columns: &[(String, ColumnKind)]) -> SchemaRef {
        let fields: Vec<Field> = columns
            .iter()
            .map(|(name, kind)| Field::new(name.clone(), kind.data_type(), true))
            .collect();
        Arc::new(Schema::new(fields))
    }

    /// The underlying Arrow batch.
    pub fn batch(&self) -> &RecordBatch {
        &self.batch
    }

    pub fn num_rows(&self) -> usize {
        self.batch.num_rows()
    }

    pub fn num_columns(&self) -> usize {
        self.batch.num_columns()
    }

    /// Whether the table holds no rows.
    pub fn is_empty(&self) -> bool {
        self.num_rows() == 0
    }

    /// Column names in table order.
    pub fn column_names(&self) -> Vec<String> {
        self.batch
            .schema_ref()
            .fields()
            .iter()
            .map(|f| f.name().clone())
            .collect()
    }

    /// Position of the column called `name`, if present.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.batch.schema_ref().index_of(name).ok()
    }

    pub fn column(&self, index: usize) -> &ArrayRef {
        self.batch.column(index)
    }

    pub fn column_kind(&self, index: usize) -> ColumnKind {
        ColumnKind::from_data_type(self.batch.column(index).data_type())
    }

    /// Cell at (`column`, `row`) rendered as text; `None` when missing.
    pub fn cell_text(&self, column: usize, row: usize) -> Option<String> {
        cell_str(self.column(column), row).map(Cow::into_owned)
    }

    /// Contiguous rows `[offset, offset + len)` as a new table.
    pub fn slice(&self, offset: usize, len: usize) -> Table {
        Table {
            batch: self.batch.slice(offset, len),
        }
    }
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match arrow::util::pretty::pretty_format_batches(std::slice::from_ref(&self.batch)) {
            Ok(rendered) => write!(f, "{rendered}"),
            Err(_) => write!(f, "<table {}x{}>", self.num_rows(), self.num_columns()),
        }
    }
}

// ---------------------------------------------------------------------------
// Cell access helpers
// ---------------------------------------------------------------------------

/// Render a float the way Pandas prints it: integral values keep a `.0`,
/// magnitudes from 1e16 up use exponent form. Either way the text never
/// reads back as an integer.
pub fn format_float(value: f64) -> String {
    if !value.is_finite() {
        value.to_string()
    } else if value.abs() >= 1e16 {
        format!("{value:e}")
    } else if value.fract() == 0.0 {
        format!("{value:.1}")
    } else {
        value.to_string()
    }
}

/// A cell as text, borrowing when the column already stores strings.
pub(crate) fn cell_str(array: &ArrayRef, row: usize) -> Option<Cow<'_, str>> {
    if array.is_null(row) {
        return None;
    }
    match array.data_type() {
        DataType::Utf8 => array
            .as_any()
            .downcast_ref::<StringArray>()
            .map(|a| Cow::Borrowed(a.value(row))),
        DataType::Int64 => array
            .as_any()
            .downcast_ref::<Int64Array>()
            .map(|a| Cow::Owned(a.value(row).to_string())),
        DataType::Float64 => array
            .as_any()
            .downcast_ref::<Float64Array>()
            .map(|a| Cow::Owned(format_float(a.value(row)))),
        _ => array_value_to_string(array, row).ok().map(Cow::Owned),
    }
}

/// A cell coerced to a number; unparseable or missing cells give `None`.
pub(crate) fn cell_f64(array: &ArrayRef, row: usize) -> Option<f64> {
    if array.is_null(row) {
        return None;
    }
    match array.data_type() {
        DataType::Int64 => array
            .as_any()
            .downcast_ref::<Int64Array>()
            .map(|a| a.value(row) as f64),
        DataType::Float64 => array
            .as_any()
            .downcast_ref::<Float64Array>()
            .map(|a| a.value(row)),
        _ => cell_str(array, row).and_then(|s| s.trim().parse::<f64>().ok()),
    }
}

/// Convert a column to `kind`, preserving missing cells.
pub(crate) fn coerce_column(array: &ArrayRef, kind: ColumnKind) -> Result<ArrayRef, ArrowError> {
    if array.data_type() == &kind.data_type() {
        return Ok(Arc::clone(array));
    }
    match kind {
        ColumnKind::Text => {
            let values: StringArray = (0..array.len())
                .map(|row| cell_str(array, row).map(Cow::into_owned))
                .collect();
            Ok(Arc::new(values))
        }
        numeric => arrow::compute::cast(array, &numeric.data_type()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arrow::array::BooleanArray;

    fn sample() -> Table {
        Table::from_columns(
            vec![
                (
                    "id".to_string(),
                    Arc::new(Int64Array::from(vec![Some(1), None, Some(3)])) as ArrayRef,
                ),
                (
                    "score".to_string(),
                    Arc::new(Float64Array::from(vec![Some(2.0), Some(0.25), None])) as ArrayRef,
                ),
                (
                    "name".to_string(),
                    Arc::new(StringArray::from(vec![Some("a"), Some("b"), None])) as ArrayRef,
                ),
            ],
            3,
        )
        .unwrap()
    }

    #[test]
    fn test_duplicate_names_are_rejected() {
        let err = Table::from_columns(
            vec![
                ("a".to_string(), Arc::new(Int64Array::from(vec![1, 2])) as ArrayRef),
                ("a".to_string(), Arc::new(Int64Array::from(vec![3, 4])) as ArrayRef),
            ],
            2,
        )
        .unwrap_err();
        assert!(err.to_string().contains("duplicate column name: a"));
    }

    #[test]
    fn test_unsupported_types_are_rejected() {
        let err = Table::from_columns(
            vec![(
                "flag".to_string(),
                Arc::new(BooleanArray::from(vec![true, false])) as ArrayRef,
            )],
            2,
        )
        .unwrap_err();
        assert!(err.to_string().contains("unsupported type"));
    }

    #[test]
    fn test_large_floats_use_exponent_form() {
        assert_eq!(format_float(1e16), "1e16");
        assert_eq!(format_float(-2.5e20), "-2.5e20");
        assert_eq!(format_float(123.0), "123.0");
        assert_eq!(format_float(0.25), "0.25");
    }

    #[test]
    fn test_column_lookup() {
        let table = sample();
        assert_eq!(table.column_names(), vec!["id", "score", "name"]);
        assert_eq!(table.column_index("score"), Some(1));
        assert_eq!(table.column_index("missing"), None);
        assert_eq!(table.column_kind(0), ColumnKind::Integer);
        assert_eq!(table.column_kind(1), ColumnKind::Float);
        assert_eq!(table.column_kind(2), ColumnKind::Text);
    }

    #[test]
    fn test_cell_text_rendering() {
        let table = sample();
        assert_eq!(table.cell_text(0, 0).as_deref(), Some("1"));
        assert_eq!(table.cell_text(0, 1), None);
        assert_eq!(table.cell_text(1, 0).as_deref(), Some("2.0"));
        assert_eq!(table.cell_text(1, 1).as_deref(), Some("0.25"));
        assert_eq!(table.cell_text(2, 2), None);
    }

    #[test]
    fn test_kind_labels() {
        assert_eq!(ColumnKind::Integer.to_string(), "integer");
        assert_eq!(ColumnKind::Float.to_string(), "float");
        assert_eq!(ColumnKind::Text.to_string(), "text");
    }

    #[test]
    fn test_kind_unification() {
        use ColumnKind::*;
        assert_eq!(Integer.unify(Integer), Integer);
        assert_eq!(Integer.unify(Float), Float);
        assert_eq!(Float.unify(Text), Text);
        assert_eq!(Text.unify(Integer), Text);
    }

    #[test]
    fn test_coerce_integer_to_text_keeps_nulls() {
        let table = sample();
        let text = coerce_column(table.column(0), ColumnKind::Text).unwrap();
        let text = text.as_any().downcast_ref::<StringArray>().unwrap();
        assert_eq!(text.value(0), "1");
        assert!(text.is_null(1));
    }

    #[test]
    fn test_slice_is_contiguous() {
        let table = sample();
        let tail = table.slice(1, 2);
        assert_eq!(tail.num_rows(), 2);
        assert_eq!(tail.cell_text(2, 0).as_deref(), Some("b"));
    }
}
