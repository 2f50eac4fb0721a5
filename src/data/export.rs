use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use csv::{Terminator, WriterBuilder};

use super::error::ExportError;
use super::model::Table;

/// Write `table` as CSV: header row, comma-delimited, quotes only where
/// needed, missing cells as empty fields, no index column.
pub fn write_to<W: Write>(table: &Table, writer: W) -> Result<(), ExportError> {
    let mut writer = WriterBuilder::new()
        .terminator(Terminator::Any(b'\n'))
        .from_writer(writer);

    writer.write_record(table.column_names())?;
    for row in 0..table.num_rows() {
        let record = (0..table.num_columns()).map(|col| table.cell_text(col, row).unwrap_or_default());
        writer.write_record(record)?;
    }
    writer.flush().map_err(csv::Error::from)?;
    Ok(())
}

/// Serialize `table` to UTF-8 CSV bytes, ready for download.
pub fn to_csv_bytes(table: &Table) -> Result<Vec<u8>, ExportError> {
    let mut buf = Vec::new();
    write_to(table, &mut buf)?;
    Ok(buf)
}

/// Write `table` to a CSV file at `path`.
pub fn write_csv(table: &Table, path: &Path) -> Result<(), ExportError> {
    let file = File::create(path).map_err(|source| ExportError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    write_to(table, BufWriter::new(file))?;
    log::info!("Wrote {} rows to {}", table.num_rows(), path.display());
    Ok(())
}

/// Write each chunk to `dir/part_<n>.csv`, numbering from 1.
pub fn write_chunks(chunks: &[Table], dir: &Path) -> Result<Vec<PathBuf>, ExportError> {
    std::fs::create_dir_all(dir).map_err(|source| ExportError::Io {
        path: dir.to_path_buf(),
        source,
    })?;

    chunks
        .iter()
        .enumerate()
        .map(|(idx, chunk)| {
            let path = dir.join(format!("part_{}.csv", idx + 1));
            write_csv(chunk, &path)?;
            Ok(path)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use std::num::NonZeroUsize;

    use tempfile::TempDir;

    use super::*;
    use crate::data::loader::load;
    use crate::data::model::ColumnKind;
    use crate::data::split::split;

    #[test]
    fn test_serialization_format() {
        let table = load(b"name,score,note\n\"Doe, J\",1.5,\nAl,2,\"say \"\"hi\"\"\"\n").unwrap();
        let bytes = to_csv_bytes(&table).unwrap();
        let text = String::from_utf8(bytes).unwrap();
        assert_eq!(
            text,
            "name,score,note\n\"Doe, J\",1.5,\nAl,2.0,\"say \"\"hi\"\"\"\n"
        );
    }

    #[test]
    fn test_latin1_input_is_written_as_utf8() {
        let table = load(b"city\nZ\xfcrich\n").unwrap();
        let bytes = to_csv_bytes(&table).unwrap();
        assert_eq!(String::from_utf8(bytes).unwrap(), "city\nZürich\n");
    }

    #[test]
    fn test_reload_round_trip() {
        let table = load(b"a,b,c\n1,x,0.5\n2,,1.5\n").unwrap();
        let reloaded = load(&to_csv_bytes(&table).unwrap()).unwrap();
        assert_eq!(reloaded, table);
    }

    #[test]
    fn test_large_floats_reload_as_floats() {
        let table = load(b"v\n1e16\n2e16\n").unwrap();
        assert_eq!(table.column_kind(0), ColumnKind::Float);

        let bytes = to_csv_bytes(&table).unwrap();
        assert_eq!(String::from_utf8(bytes.clone()).unwrap(), "v\n1e16\n2e16\n");

        let reloaded = load(&bytes).unwrap();
        assert_eq!(reloaded.column_kind(0), ColumnKind::Float);
        assert_eq!(reloaded, table);
    }

    #[test]
    fn test_write_chunks_numbers_files() {
        let dir = TempDir::new().unwrap();
        let table = load(b"id\n1\n2\n3\n4\n5\n").unwrap();
        let chunks = split(&table, NonZeroUsize::new(2).unwrap());

        let out_dir = dir.path().join("parts");
        let paths = write_chunks(&chunks, &out_dir).unwrap();

        let names: Vec<String> = paths
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["part_1.csv", "part_2.csv", "part_3.csv"]);
        assert_eq!(std::fs::read_to_string(&paths[2]).unwrap(), "id\n5\n");
    }
}
