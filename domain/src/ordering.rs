//! Position bookkeeping for ordered children (modules of a course, lessons
//! of a module).
use crate::error::Error;
use crate::Id;
use log::*;
use std::collections::HashSet;

/// Turns a requested order into `(id, position)` pairs.
///
/// `ordered_ids` must be exactly a permutation of `current_ids`: no id
/// missing, none unknown, none repeated. Anything else is `Invalid`.
pub fn plan(current_ids: &[Id], ordered_ids: &[Id]) -> Result<Vec<(Id, i32)>, Error> {
    let current: HashSet<&Id> = current_ids.iter().collect();
    let mut seen = HashSet::with_capacity(ordered_ids.len());

    let is_permutation = ordered_ids.len() == current_ids.len()
        && ordered_ids
            .iter()
            .all(|id| current.contains(id) && seen.insert(id));

    if !is_permutation {
        warn!(
            "Rejected reorder: {} ids requested for {} children",
            ordered_ids.len(),
            current_ids.len()
        );
        return Err(Error::invalid());
    }

    Ok(ordered_ids.iter().copied().zip(0..).collect())
}
