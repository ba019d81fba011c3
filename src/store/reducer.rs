//! Slice composition.
//!
//! A [`CombinedReducer`] owns a fixed map of named slices. Each slice governs
//! one partition of the root state; the combined transition applies every
//! slice to its own partition and nothing else, so the key set of the root
//! state never changes once the reducer is built.

use serde_json::Value;
use std::collections::BTreeMap;

/// Whole application state: slice name to slice state.
pub type RootState = BTreeMap<String, Value>;

/// A named partition of the root state and its transition function.
pub trait Slice<A> {
    /// State used before any action has been seen and when nothing was rehydrated.
    fn initial_state(&self) -> Value;

    /// Pure transition. Must not touch anything outside `state`.
    fn reduce(&self, state: &Value, action: &A) -> Value;
}

/// Closure-backed slice, handy when a slice has no type of its own.
pub struct SliceFn<F> {
    initial: Value,
    reduce: F,
}

pub fn slice_fn<F>(initial: Value, reduce: F) -> SliceFn<F> {
    SliceFn { initial, reduce }
}

impl<A, F> Slice<A> for SliceFn<F>
where
    F: Fn(&Value, &A) -> Value,
{
    fn initial_state(&self) -> Value {
        self.initial.clone()
    }

    fn reduce(&self, state: &Value, action: &A) -> Value {
        (self.reduce)(state, action)
    }
}

pub struct CombinedReducer<A> {
    slices: BTreeMap<String, Box<dyn Slice<A>>>,
}

impl<A> Default for CombinedReducer<A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A> CombinedReducer<A> {
    pub fn new() -> Self {
        Self {
            slices: BTreeMap::new(),
        }
    }

    /// Register a slice. A later registration under the same name replaces the
    /// earlier one; the map is frozen once the store is built.
    pub fn with_slice(mut self, name: impl Into<String>, slice: impl Slice<A> + 'static) -> Self {
        self.slices.insert(name.into(), Box::new(slice));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.slices.is_empty()
    }

    pub fn initial_state(&self) -> RootState {
        self.slices
            .iter()
            .map(|(name, slice)| (name.clone(), slice.initial_state()))
            .collect()
    }

    /// Compute the next root state. Partitions missing from `state` start from
    /// the slice's initial state; keys unknown to the reducer are dropped.
    pub fn reduce(&self, state: &RootState, action: &A) -> RootState {
        self.slices
            .iter()
            .map(|(name, slice)| {
                let next = match state.get(name) {
                    Some(prev) => slice.reduce(prev, action),
                    None => slice.reduce(&slice.initial_state(), action),
                };
                (name.clone(), next)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Debug)]
    enum TestAction {
        Increment,
        Rename(&'static str),
        Noop,
    }

    fn counter() -> impl Slice<TestAction> {
        slice_fn(json!(0), |state: &Value, action: &TestAction| match action {
            TestAction::Increment => json!(state.as_i64().unwrap_or(0) + 1),
            _ => state.clone(),
        })
    }

    fn profile() -> impl Slice<TestAction> {
        slice_fn(json!({ "name": "" }), |state: &Value, action: &TestAction| match action {
            TestAction::Rename(name) => json!({ "name": name }),
            _ => state.clone(),
        })
    }

    fn keys(state: &RootState) -> Vec<&str> {
        state.keys().map(String::as_str).collect()
    }

    #[test]
    fn empty_map_always_yields_empty_state() {
        let reducer: CombinedReducer<TestAction> = CombinedReducer::new();
        assert!(reducer.initial_state().is_empty());
        for action in [TestAction::Increment, TestAction::Rename("x"), TestAction::Noop] {
            assert!(reducer.reduce(&RootState::new(), &action).is_empty());
        }
    }

    #[test]
    fn key_set_is_stable_across_actions() {
        let reducer = CombinedReducer::new()
            .with_slice("counter", counter())
            .with_slice("profile", profile());

        let mut state = reducer.initial_state();
        assert_eq!(keys(&state), vec!["counter", "profile"]);

        for action in [
            TestAction::Increment,
            TestAction::Rename("ada"),
            TestAction::Noop,
            TestAction::Increment,
        ] {
            state = reducer.reduce(&state, &action);
            assert_eq!(keys(&state), vec!["counter", "profile"]);
        }

        assert_eq!(state["counter"], json!(2));
        assert_eq!(state["profile"], json!({ "name": "ada" }));
    }

    #[test]
    fn each_slice_only_sees_its_partition() {
        let reducer = CombinedReducer::new()
            .with_slice("a", counter())
            .with_slice("b", counter());

        let mut state = reducer.initial_state();
        state.insert("a".into(), json!(10));

        let next = reducer.reduce(&state, &TestAction::Increment);
        assert_eq!(next["a"], json!(11));
        assert_eq!(next["b"], json!(1));
    }

    #[test]
    fn unknown_keys_are_dropped_and_missing_keys_filled() {
        let reducer = CombinedReducer::new().with_slice("counter", counter());

        let mut state = RootState::new();
        state.insert("stale".into(), json!(true));

        let next = reducer.reduce(&state, &TestAction::Noop);
        assert_eq!(keys(&next), vec!["counter"]);
        assert_eq!(next["counter"], json!(0));
    }
}
