//! Combinators that turn patch-producing functions into reducer-producing
//! actions.
//!
//! Each combinator fixes one leaf-combining rule and wires it through
//! [`patch_tree`]. Calling the returned action with its arguments builds
//! the patch once and captures it in a [`Reducer`]; the state container
//! then applies that reducer whenever it likes.
//!
//! [`shallow`] is the odd one out: it skips the tree walk and merges a
//! flat field map over the top level of the state.

use std::sync::Arc;

use serde_json::{Map, Value};

use crate::patch::{NodeFn, Patch};
use crate::reducer::Reducer;
use crate::tree::patch_tree;

/// Build an action whose reducer overwrites top-level fields and keeps
/// the rest of the state.
///
/// Unlike the tree combinators, the patch function here runs at reduce
/// time and sees the current state alongside the action arguments. The
/// fields it returns are written over a copy of the state's top level;
/// every other field survives untouched. Non-object state contributes
/// nothing, so the result is exactly the returned fields.
///
/// # Examples
///
/// ```
/// use patchtree::{shallow, Map, Value};
/// use serde_json::json;
///
/// let set_name = shallow(|_state: &Value, name: &String| {
///     let mut fields = Map::new();
///     fields.insert("name".into(), json!(name));
///     fields
/// });
///
/// let state = json!({"count": 1, "name": "x"});
/// let next = set_name("y".to_string()).reduce(&state);
/// assert_eq!(next, json!({"count": 1, "name": "y"}));
/// ```
pub fn shallow<A, F>(patch: F) -> impl Fn(A) -> Reducer
where
    F: Fn(&Value, &A) -> Map<String, Value> + Send + Sync + 'static,
    A: Send + Sync + 'static,
{
    let patch = Arc::new(patch);
    move |args: A| {
        let patch = Arc::clone(&patch);
        Reducer::new(move |state| {
            let fields = (patch.as_ref())(state, &args);
            let mut merged = state.as_object().cloned().unwrap_or_default();
            for (key, value) in fields {
                merged.insert(key, value);
            }
            Value::Object(merged)
        })
    }
}

/// Build an action whose reducer appends items to the sequences the
/// patch names.
///
/// The patch function runs once per action call; the tree it returns
/// names the fields to extend. At each leaf the existing state sequence
/// comes first, followed by the patch leaf's items; a scalar patch leaf
/// appends as a single item. Where the state has no sequence at that
/// location, the field is initialized from the patch leaf alone.
///
/// The result contains exactly the fields the patch names, so this is
/// normally applied to the slice of state it owns.
///
/// # Examples
///
/// ```
/// use patchtree::{patch, push_items};
/// use serde_json::json;
///
/// let add_todo = push_items(|todo: &str| patch! { "todos": [todo] });
///
/// let state = json!({"todos": ["write tests"]});
/// let next = add_todo("ship it").reduce(&state);
/// assert_eq!(next, json!({"todos": ["write tests", "ship it"]}));
/// ```
pub fn push_items<A, F>(patch: F) -> impl Fn(A) -> Reducer
where
    F: Fn(A) -> Patch<Value>,
{
    move |args: A| {
        let tree = patch(args);
        Reducer::new(move |state| patch_tree(&tree, state, concat_into))
    }
}

/// Build an action whose reducer removes items from the sequences the
/// patch names.
///
/// At each leaf, every element of the state sequence that equals the
/// patch leaf is dropped; the survivors keep their order. A leaf whose
/// state location holds no sequence yields an empty sequence. Equality
/// is deep value equality, so whole objects can be removed by value.
///
/// # Examples
///
/// ```
/// use patchtree::{patch, remove_items};
/// use serde_json::json;
///
/// let remove_word = remove_items(|word: &str| patch! { "words": word });
///
/// let state = json!({"words": ["foo", "bar", "foo"]});
/// let next = remove_word("foo").reduce(&state);
/// assert_eq!(next, json!({"words": ["bar"]}));
/// ```
pub fn remove_items<A, F>(patch: F) -> impl Fn(A) -> Reducer
where
    F: Fn(A) -> Patch<Value>,
{
    move |args: A| {
        let tree = patch(args);
        Reducer::new(move |state| patch_tree(&tree, state, filter_from))
    }
}

/// Alias for [`remove_items`], for actions that remove a single value.
pub fn remove_item<A, F>(patch: F) -> impl Fn(A) -> Reducer
where
    F: Fn(A) -> Patch<Value>,
{
    remove_items(patch)
}

/// Build an action whose reducer replaces each named field with the
/// result of a per-leaf function.
///
/// The patch carries [`NodeFn`] leaves. Each one receives the state
/// value at its own location (`None` when the state has nothing there)
/// and returns the replacement, so a single action can update several
/// fields with independent logic.
///
/// # Examples
///
/// ```
/// use patchtree::{reduce_nodes, NodeFn, Patch};
/// use serde_json::json;
///
/// let bump = reduce_nodes(|by: i64| {
///     Patch::new().with_leaf(
///         "count",
///         NodeFn::new(move |current| {
///             json!(current.and_then(|v| v.as_i64()).unwrap_or(0) + by)
///         }),
///     )
/// });
///
/// let state = json!({"count": 40});
/// assert_eq!(bump(2).reduce(&state), json!({"count": 42}));
/// ```
pub fn reduce_nodes<A, F>(patch: F) -> impl Fn(A) -> Reducer
where
    F: Fn(A) -> Patch<NodeFn>,
{
    move |args: A| {
        let tree = patch(args);
        Reducer::new(move |state| {
            patch_tree(&tree, state, |node: &NodeFn, current| node.call(current))
        })
    }
}

/// Leaf rule for [`push_items`]: existing items first, patch items after.
fn concat_into(patch: &Value, current: Option<&Value>) -> Value {
    let mut items = match current {
        Some(Value::Array(existing)) => existing.clone(),
        _ => Vec::new(),
    };
    match patch {
        Value::Array(new_items) => items.extend(new_items.iter().cloned()),
        single => items.push(single.clone()),
    }
    Value::Array(items)
}

/// Leaf rule for [`remove_items`]: drop state items equal to the patch
/// leaf, keeping order.
fn filter_from(patch: &Value, current: Option<&Value>) -> Value {
    match current {
        Some(Value::Array(existing)) => Value::Array(
            existing
                .iter()
                .filter(|item| *item != patch)
                .cloned()
                .collect(),
        ),
        _ => Value::Array(Vec::new()),
    }
}
