use std::num::NonZeroUsize;

use super::model::Table;

/// Smallest chunk size the desktop host accepts.
pub const MIN_ROWS_PER_CHUNK: usize = 10_000;

/// Chunk size the desktop host starts with.
pub const DEFAULT_ROWS_PER_CHUNK: usize = 500_000;

/// Number of chunks `split` produces for `total_rows` rows.
pub fn chunk_count(total_rows: usize, rows_per_chunk: NonZeroUsize) -> usize {
    total_rows.div_ceil(rows_per_chunk.get())
}

/// Partition `table` into contiguous chunks of at most `rows_per_chunk` rows.
///
/// Chunk `i` holds rows `[i * n, min((i + 1) * n, total))`. Only the last
/// chunk may be shorter, none is empty, and an empty table yields no chunks.
pub fn split(table: &Table, rows_per_chunk: NonZeroUsize) -> Vec<Table> {
    let total = table.num_rows();
    let size = rows_per_chunk.get();

    let chunks: Vec<Table> = (0..total)
        .step_by(size)
        .map(|offset| table.slice(offset, size.min(total - offset)))
        .collect();

    log::info!(
        "Split {total} rows into {} chunks of up to {size} rows",
        chunks.len()
    );
    chunks
}
