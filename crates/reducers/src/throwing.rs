//! Or-throw variants
//!
//! Wrappers that refuse a violated precondition with a constraint-violation
//! error instead of proceeding. Batch forms collect every offending id
//! into one error, so a caller sees the whole problem at once.
//! On error the input state is untouched.

use crate::functions::{Creator, Merger};
use crate::primitives;
use normal_core::{Error, NormalizedCollection, Operation, Record, Result};

/// Ids in `records` that are present in `state`, in input order
fn present_ids<R: Record>(state: &NormalizedCollection<R>, records: &[R]) -> Vec<String> {
    records
        .iter()
        .filter(|r| state.contains(r.id()))
        .map(|r| r.id().to_string())
        .collect()
}

/// Ids in `records` that are absent from `state`, in input order
fn absent_ids<R: Record>(state: &NormalizedCollection<R>, records: &[R]) -> Vec<String> {
    records
        .iter()
        .filter(|r| !state.contains(r.id()))
        .map(|r| r.id().to_string())
        .collect()
}

fn ensure_absent<R: Record>(
    state: &NormalizedCollection<R>,
    records: &[R],
    op: Operation,
) -> Result<()> {
    let present = present_ids(state, records);
    if present.is_empty() {
        Ok(())
    } else {
        Err(Error::already_exists(op, present))
    }
}

fn ensure_present<R: Record>(
    state: &NormalizedCollection<R>,
    records: &[R],
    op: Operation,
) -> Result<()> {
    let absent = absent_ids(state, records);
    if absent.is_empty() {
        Ok(())
    } else {
        Err(Error::not_found(op, absent))
    }
}

// =============================================================================
// Add / create
// =============================================================================

/// [`primitives::add`], failing with `AlreadyExists` when the id is present
pub fn add_or_throw<R: Record>(
    state: &NormalizedCollection<R>,
    record: R,
) -> Result<NormalizedCollection<R>> {
    ensure_absent(state, std::slice::from_ref(&record), Operation::Add)?;
    Ok(primitives::add(state, record))
}

/// [`primitives::add_all`], failing with every present id
pub fn add_all_or_throw<R: Record>(
    state: &NormalizedCollection<R>,
    records: Vec<R>,
) -> Result<NormalizedCollection<R>> {
    ensure_absent(state, &records, Operation::AddAll)?;
    Ok(primitives::add_all(state, records))
}

/// [`primitives::create`], failing when the created record's id is present
pub fn create_or_throw<R: Record>(
    state: &NormalizedCollection<R>,
    data: R,
    creator: &Creator<R>,
) -> Result<NormalizedCollection<R>> {
    let record = creator.apply(data);
    ensure_absent(state, std::slice::from_ref(&record), Operation::Create)?;
    Ok(primitives::add(state, record))
}

/// [`primitives::create_all`], failing with every present created id
pub fn create_all_or_throw<R: Record>(
    state: &NormalizedCollection<R>,
    data: Vec<R>,
    creator: &Creator<R>,
) -> Result<NormalizedCollection<R>> {
    let records: Vec<R> = data.into_iter().map(|d| creator.apply(d)).collect();
    ensure_absent(state, &records, Operation::CreateAll)?;
    Ok(primitives::add_all(state, records))
}

// =============================================================================
// Merge / replace
// =============================================================================

/// [`primitives::merge`], failing with `NotFound` when the id is absent
pub fn merge_or_throw<R: Record>(
    state: &NormalizedCollection<R>,
    patch: R,
    merger: &Merger<R>,
) -> Result<NormalizedCollection<R>> {
    ensure_present(state, std::slice::from_ref(&patch), Operation::Merge)?;
    Ok(primitives::merge(state, patch, merger))
}

/// [`primitives::merge_all`], failing with every absent id
pub fn merge_all_or_throw<R: Record>(
    state: &NormalizedCollection<R>,
    patches: Vec<R>,
    merger: &Merger<R>,
) -> Result<NormalizedCollection<R>> {
    ensure_present(state, &patches, Operation::MergeAll)?;
    Ok(primitives::merge_all(state, patches, merger))
}

/// [`primitives::replace`], failing with `NotFound` when the id is absent
pub fn replace_or_throw<R: Record>(
    state: &NormalizedCollection<R>,
    record: R,
) -> Result<NormalizedCollection<R>> {
    ensure_present(state, std::slice::from_ref(&record), Operation::Replace)?;
    Ok(primitives::replace(state, record))
}

/// [`primitives::replace_all`], failing with every absent id
pub fn replace_all_or_throw<R: Record>(
    state: &NormalizedCollection<R>,
    records: Vec<R>,
) -> Result<NormalizedCollection<R>> {
    ensure_present(state, &records, Operation::ReplaceAll)?;
    Ok(primitives::replace_all(state, records))
}

// =============================================================================
// Move
// =============================================================================

/// [`primitives::move_record`], failing when `from` is absent or `to` is present
pub fn move_or_throw<R: Record>(
    state: &NormalizedCollection<R>,
    from: &str,
    to: &str,
) -> Result<NormalizedCollection<R>> {
    if !state.contains(from) {
        return Err(Error::not_found(Operation::Move, vec![from.to_string()]));
    }
    if state.contains(to) {
        return Err(Error::already_exists(Operation::Move, vec![to.to_string()]));
    }
    Ok(primitives::move_record(state, from, to))
}

#[cfg(test)]
mod tests {
    use super::*;
    use normal_core::Entity;

    fn state(ids: &[&str]) -> NormalizedCollection<Entity> {
        NormalizedCollection::from_records(ids.iter().map(|id| Entity::new(*id)))
    }

    fn strings(ids: &[&str]) -> Vec<String> {
        ids.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_add_or_throw() {
        let s = state(&["foo"]);
        let err = add_or_throw(&s, Entity::new("foo")).unwrap_err();
        assert_eq!(err, Error::already_exists(Operation::Add, strings(&["foo"])));
        assert_eq!(add_or_throw(&s, Entity::new("bar")).unwrap().len(), 2);
    }

    #[test]
    fn test_add_all_or_throw_aggregates() {
        let s = state(&["a", "b", "c"]);
        let err = add_all_or_throw(&s, vec![Entity::new("b"), Entity::new("x"), Entity::new("c")])
            .unwrap_err();
        assert_eq!(err.ids(), strings(&["b", "c"]).as_slice());
        assert_eq!(err.operation(), Some(Operation::AddAll));
    }

    #[test]
    fn test_create_or_throw_checks_created_record() {
        let s = state(&["foo"]);
        let rename = Creator::new("rename", |e: Entity| e.with_id("foo"));
        let err = create_or_throw(&s, Entity::new("new"), &rename).unwrap_err();
        assert_eq!(err.ids(), strings(&["foo"]).as_slice());

        let ident = Creator::identity();
        let err = create_all_or_throw(&s, vec![Entity::new("foo"), Entity::new("z")], &ident)
            .unwrap_err();
        assert_eq!(err.operation(), Some(Operation::CreateAll));
        assert!(create_all_or_throw(&s, vec![Entity::new("z")], &ident).is_ok());
    }

    #[test]
    fn test_merge_or_throw_leaves_state_untouched() {
        let s = state(&["foo"]);
        let before = s.clone();
        let err = merge_or_throw(&s, Entity::new("missing"), &Merger::shallow()).unwrap_err();
        assert!(err.is_constraint_violation());
        assert!(s.ptr_eq(&before));
        assert_eq!(s.order(), &["foo".to_string()]);
    }

    #[test]
    fn test_merge_all_or_throw_reports_all_missing_in_one_error() {
        let s = state(&["foo", "bar"]);
        let err = merge_all_or_throw(
            &s,
            vec![Entity::new("foo"), Entity::new("m1"), Entity::new("m2")],
            &Merger::shallow(),
        )
        .unwrap_err();
        assert_eq!(err, Error::not_found(Operation::MergeAll, strings(&["m1", "m2"])));
        assert_eq!(err.to_string(), "can't merge ids m1, m2: not found");
    }

    #[test]
    fn test_replace_or_throw() {
        let s = state(&["foo"]);
        assert!(replace_or_throw(&s, Entity::new("foo")).is_ok());
        let err = replace_or_throw(&s, Entity::new("nope")).unwrap_err();
        assert_eq!(err.operation(), Some(Operation::Replace));
        let err = replace_all_or_throw(&s, vec![Entity::new("x"), Entity::new("y")]).unwrap_err();
        assert_eq!(err.ids().len(), 2);
    }

    #[test]
    fn test_move_or_throw() {
        let s = state(&["foo", "bar"]);
        let err = move_or_throw(&s, "nope", "baz").unwrap_err();
        assert_eq!(err, Error::not_found(Operation::Move, strings(&["nope"])));
        let err = move_or_throw(&s, "foo", "bar").unwrap_err();
        assert_eq!(err, Error::already_exists(Operation::Move, strings(&["bar"])));
        let next = move_or_throw(&s, "foo", "baz").unwrap();
        assert_eq!(next.order(), &["bar".to_string(), "baz".to_string()]);
    }

    #[test]
    fn test_empty_batches_are_not_errors() {
        let s = state(&["foo"]);
        assert!(add_all_or_throw(&s, vec![]).unwrap().ptr_eq(&s));
        assert!(merge_all_or_throw(&s, vec![], &Merger::shallow()).unwrap().ptr_eq(&s));
        assert!(replace_all_or_throw(&s, vec![]).unwrap().ptr_eq(&s));
    }
}
