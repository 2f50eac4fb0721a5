use std::collections::HashMap;

use arrow::array::{new_null_array, ArrayRef};
use arrow::datatypes::SchemaRef;
use arrow::error::ArrowError;
use arrow::record_batch::{RecordBatch, RecordBatchOptions};

use super::error::ConcatError;
use super::model::{coerce_column, ColumnKind, Table};

/// Stack `tables` row-wise.
///
/// The result has the union of all columns, in first-seen order. A table
/// lacking a column contributes missing cells to it. When inputs disagree on
/// a column's kind it is widened (integer + float → float, anything + text
/// → text).
pub fn concat(tables: &[Table]) -> Result<Table, ConcatError> {
    if tables.is_empty() {
        return Err(ConcatError::Empty);
    }

    let columns = union_columns(tables);
    let schema = Table::schema_for(&columns);

    let batches = tables
        .iter()
        .map(|table| conform(table, &columns, &schema))
        .collect::<Result<Vec<_>, _>>()?;
    let batch = arrow::compute::concat_batches(&schema, &batches)?;

    log::info!(
        "Combined {} tables into {} rows x {} columns",
        tables.len(),
        batch.num_rows(),
        batch.num_columns()
    );
    Ok(Table::from_batch(batch))
}

/// Column names across all tables in first-seen order, with widened kinds.
fn union_columns(tables: &[Table]) -> Vec<(String, ColumnKind)> {
    let mut columns: Vec<(String, ColumnKind)> = Vec::new();
    let mut positions: HashMap<String, usize> = HashMap::new();

    for table in tables {
        for (index, name) in table.column_names().into_iter().enumerate() {
            let kind = table.column_kind(index);
            match positions.get(&name) {
                Some(&pos) => columns[pos].1 = columns[pos].1.unify(kind),
                None => {
                    positions.insert(name.clone(), columns.len());
                    columns.push((name, kind));
                }
            }
        }
    }
    columns
}

/// Rebuild `table` against the union schema.
fn conform(
    table: &Table,
    columns: &[(String, ColumnKind)],
    schema: &SchemaRef,
) -> Result<RecordBatch, ArrowError> {
    let arrays = columns
        .iter()
        .map(|(name, kind)| match table.column_index(name) {
            Some(index) => coerce_column(table.column(index), *kind),
            None => Ok(new_null_array(&kind.data_type(), table.num_rows())),
        })
        .collect::<Result<Vec<ArrayRef>, _>>()?;

    RecordBatch::try_new_with_options(
        schema.clone(),
        arrays,
        &RecordBatchOptions::new().with_row_count(Some(table.num_rows())),
    )
}
