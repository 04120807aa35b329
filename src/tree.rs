//! The recursive patch-tree walker.

use serde_json::{Map, Value};

use crate::patch::{Patch, PatchNode};

/// Walk a patch and combine every leaf with the state value at the same
/// location.
///
/// The output is a freshly built object shaped exactly like the patch:
/// one entry per patch key at every level, nothing more. State keys the
/// patch does not name are absent from the result, so callers that want
/// to keep the rest of the state merge the result back in themselves
/// (that is what [`shallow`](crate::shallow) does at the top level).
///
/// Descent follows both trees in lockstep. Where the state has no value
/// at a patch location, or a scalar sits where the patch expects an
/// object, the iteratee receives `None` and descent continues with no
/// state on that side. The state itself is never modified.
///
/// # Examples
///
/// ```
/// use patchtree::{patch, patch_tree, Value};
/// use serde_json::json;
///
/// let state = json!({"count": 1, "tags": ["a"]});
/// let patch = patch! { "count": 10 };
///
/// let next = patch_tree(&patch, &state, |leaf: &Value, _current| leaf.clone());
/// assert_eq!(next, json!({"count": 10}));
/// assert_eq!(state, json!({"count": 1, "tags": ["a"]}));
/// ```
pub fn patch_tree<L, F>(patch: &Patch<L>, state: &Value, iteratee: F) -> Value
where
    F: Fn(&L, Option<&Value>) -> Value,
{
    walk(patch, Some(state), &iteratee)
}

fn walk<L, F>(patch: &Patch<L>, state: Option<&Value>, iteratee: &F) -> Value
where
    F: Fn(&L, Option<&Value>) -> Value,
{
    let mut output = Map::new();
    for (key, node) in patch.iter() {
        // Value::get is None for missing keys and for non-object state,
        // which is exactly the "nothing here" the iteratee expects.
        let current = state.and_then(|s| s.get(key));
        let next = match node {
            PatchNode::Branch(inner) => walk(inner, current, iteratee),
            PatchNode::Leaf(leaf) => iteratee(leaf, current),
        };
        output.insert(key.clone(), next);
    }
    Value::Object(output)
}
