use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use arrow::array::{BooleanArray, BooleanBuilder};

use super::error::FilterError;
use super::model::{cell_f64, cell_str, Table};

// ---------------------------------------------------------------------------
// Operators
// ---------------------------------------------------------------------------

/// Comparison applied between a column and an operand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FilterOp {
    Gt,
    Lt,
    Ge,
    Le,
    Eq,
    Ne,
    Contains,
    StartsWith,
    EndsWith,
    In,
}

impl FilterOp {
    /// Every operator, in the order a picker should list them.
    pub const ALL: [FilterOp; 10] = [
        FilterOp::Gt,
        FilterOp::Lt,
        FilterOp::Ge,
        FilterOp::Le,
        FilterOp::Eq,
        FilterOp::Ne,
        FilterOp::Contains,
        FilterOp::StartsWith,
        FilterOp::EndsWith,
        FilterOp::In,
    ];

    pub fn symbol(self) -> &'static str {
        match self {
            FilterOp::Gt => ">",
            FilterOp::Lt => "<",
            FilterOp::Ge => ">=",
            FilterOp::Le => "<=",
            FilterOp::Eq => "==",
            FilterOp::Ne => "!=",
            FilterOp::Contains => "contains",
            FilterOp::StartsWith => "startswith",
            FilterOp::EndsWith => "endswith",
            FilterOp::In => "in",
        }
    }

    /// Whether the operator compares numbers rather than text.
    pub fn is_numeric(self) -> bool {
        matches!(self, FilterOp::Gt | FilterOp::Lt | FilterOp::Ge | FilterOp::Le)
    }
}

impl fmt::Display for FilterOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

impl FromStr for FilterOp {
    type Err = FilterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FilterOp::ALL
            .into_iter()
            .find(|op| op.symbol() == s)
            .ok_or_else(|| FilterError::UnknownOperator(s.to_string()))
    }
}

// ---------------------------------------------------------------------------
// Filter specification
// ---------------------------------------------------------------------------

/// One `column <op> operand` condition. The operand is always text and is
/// coerced according to the operator.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterSpec {
    pub column: String,
    pub op: FilterOp,
    pub operand: String,
}

impl FilterSpec {
    pub fn new(column: impl Into<String>, op: FilterOp, operand: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            op,
            operand: operand.into(),
        }
    }
}

/// Compiled form of an operand.
enum Predicate<'a> {
    Numeric { op: FilterOp, bound: f64 },
    Text { op: FilterOp, operand: &'a str },
    AnyOf(HashSet<&'a str>),
}

impl<'a> Predicate<'a> {
    fn compile(op: FilterOp, operand: &'a str) -> Result<Self, FilterError> {
        if op.is_numeric() {
            let bound = operand
                .trim()
                .parse::<f64>()
                .map_err(|_| FilterError::InvalidOperand(operand.to_string()))?;
            return Ok(Predicate::Numeric { op, bound });
        }
        if op == FilterOp::In {
            return Ok(Predicate::AnyOf(operand.split(',').map(str::trim).collect()));
        }
        Ok(Predicate::Text { op, operand })
    }

    fn matches_number(&self, value: Option<f64>) -> bool {
        let (Predicate::Numeric { op, bound }, Some(v)) = (self, value) else {
            return false;
        };
        match op {
            FilterOp::Gt => v > *bound,
            FilterOp::Lt => v < *bound,
            FilterOp::Ge => v >= *bound,
            FilterOp::Le => v <= *bound,
            _ => false,
        }
    }

    fn matches_text(&self, value: Option<&str>) -> bool {
        match (self, value) {
            // A missing cell differs from every operand.
            (Predicate::Text { op: FilterOp::Ne, .. }, None) => true,
            (_, None) => false,
            (Predicate::AnyOf(wanted), Some(v)) => wanted.contains(v),
            (Predicate::Text { op, operand }, Some(v)) => match op {
                FilterOp::Eq => v == *operand,
                FilterOp::Ne => v != *operand,
                FilterOp::Contains => v.contains(operand),
                FilterOp::StartsWith => v.starts_with(operand),
                FilterOp::EndsWith => v.ends_with(operand),
                _ => false,
            },
            (Predicate::Numeric { .. }, Some(_)) => false,
        }
    }
}

// ---------------------------------------------------------------------------
// Evaluation
// ---------------------------------------------------------------------------

/// Evaluate `spec` against every row of `table`.
///
/// The mask has one non-null entry per row. Fails when the column does not
/// exist or when a numeric operator gets a non-numeric operand.
pub fn selection_mask(table: &Table, spec: &FilterSpec) -> Result<BooleanArray, FilterError> {
    let index = table
        .column_index(&spec.column)
        .ok_or_else(|| FilterError::ColumnNotFound(spec.column.clone()))?;
    let predicate = Predicate::compile(spec.op, &spec.operand)?;

    let column = table.column(index);
    let mut mask = BooleanBuilder::with_capacity(table.num_rows());
    for row in 0..table.num_rows() {
        let keep = if spec.op.is_numeric() {
            predicate.matches_number(cell_f64(column, row))
        } else {
            predicate.matches_text(cell_str(column, row).as_deref())
        };
        mask.append_value(keep);
    }
    Ok(mask.finish())
}

/// Rows of `table` satisfying `spec`, with every column kept in order.
pub fn apply(table: &Table, spec: &FilterSpec) -> Result<Table, FilterError> {
    let mask = selection_mask(table, spec)?;
    let batch = arrow::compute::filter_record_batch(table.batch(), &mask)?;
    let filtered = Table::from_batch(batch);
    log::info!(
        "Filter `{} {} {}` kept {} of {} rows",
        spec.column,
        spec.op,
        spec.operand,
        filtered.num_rows(),
        table.num_rows()
    );
    Ok(filtered)
}

/// Convenience form of [`apply`].
pub fn filter(
    table: &Table,
    column: &str,
    op: FilterOp,
    operand: &str,
) -> Result<Table, FilterError> {
    apply(table, &FilterSpec::new(column, op, operand))
}
