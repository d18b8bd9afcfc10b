//! Property tests over arbitrary operation sequences

use normal_reducer::{
    add, add_all, add_all_if_new, add_or_merge_all, add_or_replace, create_all, merge,
    merge_all, merge_all_or_throw, move_record, move_safe, remove, remove_all, replace,
    replace_all, replace_all_existing, Creator, Entity, Merger, NormalizedCollection,
    Operation, Record, ShallowMerge,
};
use proptest::prelude::*;
use std::collections::BTreeSet;

#[derive(Debug, Clone)]
enum Op {
    Add(Entity),
    AddAll(Vec<Entity>),
    AddAllIfNew(Vec<Entity>),
    AddOrMergeAll(Vec<Entity>),
    AddOrReplace(Entity),
    CreateAll(Vec<Entity>),
    Merge(Entity),
    MergeAll(Vec<Entity>),
    Replace(Entity),
    ReplaceAll(Vec<Entity>),
    ReplaceAllExisting(Vec<Entity>),
    Move(String, String),
    MoveSafe(String, String),
    Remove(String),
    RemoveAll(Vec<String>),
}

fn id_strategy() -> impl Strategy<Value = String> {
    "[a-f]"
}

fn entity_strategy() -> impl Strategy<Value = Entity> {
    (id_strategy(), 0i64..100, proptest::option::of("[xyz]"))
        .prop_map(|(id, n, tag)| {
            let e = Entity::new(id).with("n", n);
            match tag {
                Some(tag) => e.with("tag", tag),
                None => e,
            }
        })
}

fn batch_strategy() -> impl Strategy<Value = Vec<Entity>> {
    proptest::collection::vec(entity_strategy(), 0..5)
}

fn op_strategy() -> impl Strategy<Value = Op> {
    let inserts = prop_oneof![
        entity_strategy().prop_map(Op::Add),
        batch_strategy().prop_map(Op::AddAll),
        batch_strategy().prop_map(Op::AddAllIfNew),
        batch_strategy().prop_map(Op::AddOrMergeAll),
        entity_strategy().prop_map(Op::AddOrReplace),
        batch_strategy().prop_map(Op::CreateAll),
    ];
    let updates = prop_oneof![
        entity_strategy().prop_map(Op::Merge),
        batch_strategy().prop_map(Op::MergeAll),
        entity_strategy().prop_map(Op::Replace),
        batch_strategy().prop_map(Op::ReplaceAll),
        batch_strategy().prop_map(Op::ReplaceAllExisting),
    ];
    let removals = prop_oneof![
        (id_strategy(), id_strategy()).prop_map(|(a, b)| Op::Move(a, b)),
        (id_strategy(), id_strategy()).prop_map(|(a, b)| Op::MoveSafe(a, b)),
        id_strategy().prop_map(Op::Remove),
        proptest::collection::vec(id_strategy(), 0..4).prop_map(Op::RemoveAll),
    ];
    prop_oneof![inserts, updates, removals]
}

fn apply(state: &NormalizedCollection<Entity>, op: Op) -> NormalizedCollection<Entity> {
    let merger = Merger::shallow();
    let creator = Creator::new("stamp", |e: Entity| e.with("created", true));
    match op {
        Op::Add(r) => add(state, r),
        Op::AddAll(rs) => add_all(state, rs),
        Op::AddAllIfNew(rs) => add_all_if_new(state, rs),
        Op::AddOrMergeAll(rs) => add_or_merge_all(state, rs, &merger),
        Op::AddOrReplace(r) => add_or_replace(state, r),
        Op::CreateAll(rs) => create_all(state, rs, &creator),
        Op::Merge(r) => merge(state, r, &merger),
        Op::MergeAll(rs) => merge_all(state, rs, &merger),
        Op::Replace(r) => replace(state, r),
        Op::ReplaceAll(rs) => replace_all(state, rs),
        Op::ReplaceAllExisting(rs) => replace_all_existing(state, rs),
        Op::Move(from, to) => move_record(state, &from, &to),
        Op::MoveSafe(from, to) => move_safe(state, &from, &to),
        Op::Remove(id) => remove(state, &id),
        Op::RemoveAll(ids) => remove_all(state, &ids),
    }
}

fn state_strategy() -> impl Strategy<Value = NormalizedCollection<Entity>> {
    proptest::collection::vec(entity_strategy(), 0..6).prop_map(|records| NormalizedCollection::from_records(records))
}

proptest! {
    #![proptest_config(ProptestConfig { cases: 128, .. ProptestConfig::default() })]

    /// order has no duplicates, matches the index keys, and every record
    /// is stored under its own id
    #[test]
    fn order_and_index_stay_consistent(ops in proptest::collection::vec(op_strategy(), 0..30)) {
        let mut state = NormalizedCollection::new();
        for op in ops {
            let prev = state.clone();
            state = apply(&state, op);
            prev.check_invariants().unwrap();
            state.check_invariants().unwrap();

            let unique: BTreeSet<&String> = state.order().iter().collect();
            prop_assert_eq!(unique.len(), state.order().len());
            let keys: BTreeSet<&String> = state.index().keys().collect();
            prop_assert_eq!(unique, keys);
            for (k, r) in state.index() {
                prop_assert_eq!(k.as_str(), r.id());
            }
        }
    }

    /// no-ops return the input reference
    #[test]
    fn noops_return_same_reference(state in state_strategy(), absent in "[g-k]") {
        let merger = Merger::shallow();
        prop_assert!(remove(&state, &absent).ptr_eq(&state));
        prop_assert!(remove_all(&state, &[absent.clone()]).ptr_eq(&state));
        prop_assert!(move_safe(&state, &absent, "zz").ptr_eq(&state));
        prop_assert!(replace_all_existing(&state, vec![Entity::new(absent.clone())]).ptr_eq(&state));

        let present: Vec<Entity> = state.index().values().cloned().collect();
        prop_assert!(add_all_if_new(&state, present).ptr_eq(&state));

        prop_assert!(add_all(&state, vec![]).ptr_eq(&state));
        prop_assert!(merge_all(&state, vec![], &merger).ptr_eq(&state));
        prop_assert!(replace_all(&state, vec![]).ptr_eq(&state));
        prop_assert!(remove_all::<Entity, String>(&state, &[]).ptr_eq(&state));
    }

    /// merge stores the shallow merge, or the custom merger's result
    #[test]
    fn merge_applies_merger(state in state_strategy(), patch in entity_strategy()) {
        prop_assume!(state.contains(patch.id()));
        let old = state.get(patch.id()).unwrap().clone();

        let next = merge(&state, patch.clone(), &Merger::shallow());
        prop_assert_eq!(next.get(patch.id()).unwrap(), &old.shallow_merge(&patch));

        let pick_patch = Merger::new("pick_patch", |_: &Entity, p: &Entity| p.clone());
        let next = merge(&state, patch.clone(), &pick_patch);
        prop_assert_eq!(next.get(patch.id()).unwrap(), &patch);
        prop_assert!(next.shares_order_with(&state));
    }

    /// move drops `from`, appends `to` once and rewrites the record's id
    #[test]
    fn move_rewrites_identity(state in state_strategy(), to in "[g-k]") {
        prop_assume!(!state.is_empty());
        let from = state.order()[0].clone();
        let old = state.get(&from).unwrap().clone();

        let next = move_record(&state, &from, &to);
        prop_assert!(!next.order().contains(&from));
        prop_assert_eq!(next.order().iter().filter(|id| **id == to).count(), 1);
        prop_assert_eq!(next.order().last(), Some(&to));
        prop_assert!(!next.contains(&from));
        prop_assert_eq!(next.get(&to).unwrap(), &old.with_id(&to));
    }

    /// or-throw batches report every absent id in one error
    #[test]
    fn merge_all_or_throw_aggregates(state in state_strategy(), a in "[g-i]", b in "[j-l]") {
        let mut batch: Vec<Entity> = state.index().values().cloned().collect();
        batch.insert(0, Entity::new(a.clone()));
        batch.push(Entity::new(b.clone()));

        let err = merge_all_or_throw(&state, batch, &Merger::shallow()).unwrap_err();
        prop_assert_eq!(err.operation(), Some(Operation::MergeAll));
        prop_assert_eq!(err.ids(), &[a, b][..]);
    }
}
