use super::error::SelectError;
use super::model::Table;

/// Keep only the named columns, in the order given. Repeated names are kept once.
pub fn select_columns<S: AsRef<str>>(table: &Table, names: &[S]) -> Result<Table, SelectError> {
    if names.is_empty() {
        return Err(SelectError::NoColumns);
    }

    let mut indices: Vec<usize> = Vec::with_capacity(names.len());
    for name in names {
        let name = name.as_ref();
        let index = table
            .column_index(name)
            .ok_or_else(|| SelectError::ColumnNotFound(name.to_string()))?;
        if !indices.contains(&index) {
            indices.push(index);
        }
    }

    let batch = table.batch().project(&indices)?;
    Ok(Table::from_batch(batch))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::loader::load;

    #[test]
    fn test_projects_in_requested_order() {
        let table = load(b"a,b,c\n1,2,3\n").unwrap();
        let out = select_columns(&table, &["c", "a", "c"]).unwrap();
        assert_eq!(out.column_names(), vec!["c", "a"]);
        assert_eq!(out.num_rows(), 1);
        assert_eq!(out.cell_text(0, 0).as_deref(), Some("3"));
    }

    #[test]
    fn test_requires_a_column() {
        let table = load(b"a\n1\n").unwrap();
        let none: [&str; 0] = [];
        assert!(matches!(
            select_columns(&table, &none),
            Err(SelectError::NoColumns)
        ));
    }

    #[test]
    fn test_unknown_column() {
        let table = load(b"a\n1\n").unwrap();
        let err = select_columns(&table, &["z"]).unwrap_err();
        assert!(matches!(err, SelectError::ColumnNotFound(ref c) if c == "z"));
    }
}
