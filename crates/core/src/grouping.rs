//! One-pass grouping of flat one-to-many join results into nested records.
//!
//! A `parent JOIN owner LEFT JOIN child` query repeats the parent columns once
//! per child row (or once with null child columns when there are none).
//! [`group_joined_rows`] folds such a row set back into one [`Grouped`] record
//! per parent key, preserving first-seen order of parents and of each
//! parent's children.

use std::collections::HashSet;

use indexmap::IndexMap;
use serde::Serialize;

use crate::error::CoreError;
use crate::types::DbId;

/// A single row of a one-to-many join result.
///
/// Implementors describe how to pull the parent record and the (optional)
/// child record out of the flat row. `parent_key` is `None` only for
/// malformed rows; `child_key` is `None` when the left join found no child.
pub trait JoinedRow {
    /// Parent record (including any 1:1 joined columns such as the owner).
    type Parent;
    /// Child record collected into [`Grouped::children`].
    type Child;

    fn parent_key(&self) -> Option<DbId>;

    /// Build the parent record. Only called for the first row of each key.
    fn parent(&self) -> Self::Parent;

    fn child_key(&self) -> Option<DbId>;

    /// Build the child record. Only called when `child_key` is `Some` and the
    /// key has not been seen yet for this parent.
    fn child(&self) -> Result<Self::Child, CoreError>;
}

/// A parent record with its ordered list of children.
///
/// Serializes as the parent's fields with an extra `children` array.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Grouped<P, C> {
    #[serde(flatten)]
    pub parent: P,
    pub children: Vec<C>,
}

/// Group joined rows by parent key in a single left-to-right pass.
///
/// - One output record per distinct parent key, in order of first occurrence.
/// - Parent fields are copied from the first row seen for that key.
/// - Children are appended in first-seen order; duplicate child keys within
///   a parent are dropped.
/// - A row without a parent key fails with [`CoreError::InvalidInput`].
pub fn group_joined_rows<R: JoinedRow>(
    rows: &[R],
) -> Result<Vec<Grouped<R::Parent, R::Child>>, CoreError> {
    let mut groups: IndexMap<DbId, (Grouped<R::Parent, R::Child>, HashSet<DbId>)> =
        IndexMap::new();

    for (index, row) in rows.iter().enumerate() {
        let key = row.parent_key().ok_or_else(|| {
            CoreError::InvalidInput(format!("joined row {index} is missing its parent key"))
        })?;

        let (group, seen_children) = groups.entry(key).or_insert_with(|| {
            (
                Grouped {
                    parent: row.parent(),
                    children: Vec::new(),
                },
                HashSet::new(),
            )
        });

        if let Some(child_key) = row.child_key() {
            if seen_children.insert(child_key) {
                group.children.push(row.child()?);
            }
        }
    }

    Ok(groups.into_values().map(|(group, _)| group).collect())
}

/// Group rows expected to describe exactly one parent.
///
/// Returns the first grouped record, or [`CoreError::NotFound`] when `rows`
/// is empty.
pub fn group_single<R: JoinedRow>(
    rows: &[R],
    entity: &'static str,
    id: DbId,
) -> Result<Grouped<R::Parent, R::Child>, CoreError> {
    group_joined_rows(rows)?
        .into_iter()
        .next()
        .ok_or(CoreError::NotFound { entity, id })
}
