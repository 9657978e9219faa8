use log::debug;
use rayon::prelude::*;
use thiserror::Error;

use super::classify::{ClassifyError, InferenceOptions, classify_column};
use super::model::{RawColumn, RawTable, TypedColumn, TypedTable};

/// A column that could not be classified; the whole table is rejected.
#[derive(Debug, Error, PartialEq)]
#[error("failed to infer type of column '{column}': {source}")]
pub struct ColumnFailure {
    pub column: String,
    #[source]
    pub source: ClassifyError,
}

/// Classify every column of `table`, keeping source column order.
///
/// Columns are independent, so tables with at least `parallel_min_rows`
/// rows are classified on the rayon pool.
pub fn normalize_table(
    table: &RawTable,
    options: &InferenceOptions,
    parallel_min_rows: usize,
) -> Result<TypedTable, ColumnFailure> {
    let row_count = table.row_count();
    let classify = |col: &RawColumn| -> Result<TypedColumn, ColumnFailure> {
        let typed = classify_column(&col.name, &col.values, row_count, options).map_err(|source| {
            ColumnFailure {
                column: col.name.clone(),
                source,
            }
        })?;
        debug!("column '{}' inferred as {}", typed.name, typed.dtype);
        Ok(typed)
    };

    let columns = if row_count >= parallel_min_rows && table.columns().len() > 1 {
        table
            .columns()
            .par_iter()
            .map(classify)
            .collect::<Result<Vec<_>, _>>()?
    } else {
        table
            .columns()
            .iter()
            .map(classify)
            .collect::<Result<Vec<_>, _>>()?
    };

    Ok(TypedTable { columns, row_count })
}
