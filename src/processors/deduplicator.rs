use crate::error::Result;
use crate::models::{Table, Value};
use std::collections::HashSet;
use std::hash::Hash;
use tracing::debug;

/// Removes duplicate rows, keeping the first occurrence of each.
pub struct Deduplicator;

impl Deduplicator {
    /// Drop rows identical to an earlier row in every column.
    pub fn dedup(table: &mut Table) -> usize {
        let keep = keep_first(table.rows(), |_, row| row);
        let removed = table.retain_rows(|index, _| keep[index]);
        debug!("Removed {} exact duplicate rows", removed);
        removed
    }

    /// Drop rows identical to an earlier row in every column except `ignored`.
    pub fn dedup_ignoring(table: &mut Table, ignored: &[&str]) -> Result<usize> {
        let compared = compared_columns(table, ignored)?;
        let keep = keep_first(table.rows(), |_, row| project(row, &compared));
        Ok(table.retain_rows(|index, _| keep[index]))
    }

    /// Drop rows whose `key(index, row)` was already produced by an earlier row.
    pub fn dedup_by_key<'a, K, F>(rows: &'a [Vec<Value>], key: F) -> Vec<bool>
    where
        K: Hash + Eq,
        F: FnMut(usize, &'a [Value]) -> K,
    {
        keep_first(rows, key)
    }
}

/// Keep-mask: `true` for the first row producing each key.
fn keep_first<'a, K, F>(rows: &'a [Vec<Value>], mut key: F) -> Vec<bool>
where
    K: Hash + Eq,
    F: FnMut(usize, &'a [Value]) -> K,
{
    let mut seen = HashSet::with_capacity(rows.len());
    rows.iter()
        .enumerate()
        .map(|(index, row)| seen.insert(key(index, row.as_slice())))
        .collect()
}

/// Indices of all columns not named in `ignored`. Every ignored name must exist.
pub(crate) fn compared_columns(table: &Table, ignored: &[&str]) -> Result<Vec<usize>> {
    let ignored = ignored
        .iter()
        .map(|name| table.column_index(name))
        .collect::<Result<HashSet<_>>>()?;
    Ok((0..table.width()).filter(|i| !ignored.contains(i)).collect())
}

pub(crate) fn project<'a>(row: &'a [Value], columns: &[usize]) -> Vec<&'a Value> {
    columns.iter().map(|&i| &row[i]).collect()
}
