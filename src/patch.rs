//! Patch trees: declarative descriptions of where in the state to apply
//! a change.
//!
//! A [`Patch`] mirrors the shape of the state it targets. Interior keys
//! hold nested patches ([`PatchNode::Branch`]); terminal keys hold leaf
//! payloads ([`PatchNode::Leaf`]). The leaf type is generic: combinators
//! that append or filter carry plain [`Value`] leaves, while
//! [`reduce_nodes`](crate::reduce_nodes) carries [`NodeFn`] leaves that
//! compute the next value from the current one.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};

use crate::error::{value_type_name, PatchError, PatchResult};

/// A single node of a patch tree.
#[derive(Debug, Clone, PartialEq)]
pub enum PatchNode<L> {
    /// A nested patch for a sub-object of the state.
    Branch(Patch<L>),
    /// A terminal payload handed to the leaf-combining rule.
    Leaf(L),
}

impl<L> PatchNode<L> {
    /// Create a leaf node.
    #[inline]
    pub fn leaf(leaf: impl Into<L>) -> Self {
        PatchNode::Leaf(leaf.into())
    }

    /// Create a branch node.
    #[inline]
    pub fn branch(patch: Patch<L>) -> Self {
        PatchNode::Branch(patch)
    }

    /// Check if this node is a leaf.
    #[inline]
    pub fn is_leaf(&self) -> bool {
        matches!(self, PatchNode::Leaf(_))
    }

    /// Check if this node is a branch.
    #[inline]
    pub fn is_branch(&self) -> bool {
        matches!(self, PatchNode::Branch(_))
    }

    /// Get the leaf payload, if this node is a leaf.
    #[inline]
    pub fn as_leaf(&self) -> Option<&L> {
        match self {
            PatchNode::Leaf(leaf) => Some(leaf),
            PatchNode::Branch(_) => None,
        }
    }

    /// Get the nested patch, if this node is a branch.
    #[inline]
    pub fn as_branch(&self) -> Option<&Patch<L>> {
        match self {
            PatchNode::Branch(patch) => Some(patch),
            PatchNode::Leaf(_) => None,
        }
    }
}

/// A tree of keyed changes, shaped like the state it applies to.
///
/// Keys are kept in sorted order, so iteration and the output of
/// [`patch_tree`](crate::patch_tree) are deterministic regardless of
/// insertion order.
///
/// # Examples
///
/// ```
/// use patchtree::{Patch, Value};
///
/// let patch: Patch<Value> = Patch::new()
///     .with_leaf("count", 1)
///     .with_branch("meta", Patch::new().with_leaf("dirty", true));
///
/// assert_eq!(patch.len(), 2);
/// assert!(patch.get("meta").is_some_and(|n| n.is_branch()));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Patch<L> {
    nodes: BTreeMap<String, PatchNode<L>>,
}

impl<L> Patch<L> {
    /// Create an empty patch.
    #[inline]
    pub fn new() -> Self {
        Patch {
            nodes: BTreeMap::new(),
        }
    }

    /// Add a leaf, builder style.
    #[inline]
    pub fn with_leaf(mut self, key: impl Into<String>, leaf: impl Into<L>) -> Self {
        self.nodes.insert(key.into(), PatchNode::Leaf(leaf.into()));
        self
    }

    /// Add a nested branch, builder style.
    #[inline]
    pub fn with_branch(mut self, key: impl Into<String>, branch: Patch<L>) -> Self {
        self.nodes.insert(key.into(), PatchNode::Branch(branch));
        self
    }

    /// Insert a node at `key`, replacing any existing node.
    #[inline]
    pub fn insert(&mut self, key: impl Into<String>, node: PatchNode<L>) {
        self.nodes.insert(key.into(), node);
    }

    /// Get the node at `key`.
    #[inline]
    pub fn get(&self, key: &str) -> Option<&PatchNode<L>> {
        self.nodes.get(key)
    }

    /// Check whether `key` is present.
    #[inline]
    pub fn contains_key(&self, key: &str) -> bool {
        self.nodes.contains_key(key)
    }

    /// Iterate over keys in sorted order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.nodes.keys().map(String::as_str)
    }

    /// Iterate over entries in sorted key order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &PatchNode<L>)> {
        self.nodes.iter()
    }

    /// Number of top-level keys.
    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Check if the patch has no keys.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Merge another patch into this one.
    ///
    /// Entries from `other` replace same-named entries of `self`.
    pub fn merge(&mut self, other: Patch<L>) {
        self.nodes.extend(other.nodes);
    }
}

impl<L> Default for Patch<L> {
    fn default() -> Self {
        Self::new()
    }
}

impl<L> FromIterator<(String, PatchNode<L>)> for Patch<L> {
    fn from_iter<I: IntoIterator<Item = (String, PatchNode<L>)>>(iter: I) -> Self {
        Patch {
            nodes: iter.into_iter().collect(),
        }
    }
}

impl<L> Extend<(String, PatchNode<L>)> for Patch<L> {
    fn extend<I: IntoIterator<Item = (String, PatchNode<L>)>>(&mut self, iter: I) {
        self.nodes.extend(iter);
    }
}

impl<L> IntoIterator for Patch<L> {
    type Item = (String, PatchNode<L>);
    type IntoIter = std::collections::btree_map::IntoIter<String, PatchNode<L>>;

    fn into_iter(self) -> Self::IntoIter {
        self.nodes.into_iter()
    }
}

impl<'a, L> IntoIterator for &'a Patch<L> {
    type Item = (&'a String, &'a PatchNode<L>);
    type IntoIter = std::collections::btree_map::Iter<'a, String, PatchNode<L>>;

    fn into_iter(self) -> Self::IntoIter {
        self.nodes.iter()
    }
}

fn node_from_value(value: Value) -> PatchNode<Value> {
    match value {
        Value::Object(map) => PatchNode::Branch(Patch::from(map)),
        other => PatchNode::Leaf(other),
    }
}

/// Every nested object becomes a branch; everything else is a leaf.
impl From<Map<String, Value>> for Patch<Value> {
    fn from(map: Map<String, Value>) -> Self {
        let nodes = map
            .into_iter()
            .map(|(key, value)| (key, node_from_value(value)))
            .collect();
        Patch { nodes }
    }
}

/// Fallible promotion of arbitrary JSON: only objects make valid patch
/// roots.
impl TryFrom<Value> for Patch<Value> {
    type Error = PatchError;

    fn try_from(value: Value) -> PatchResult<Self> {
        match value {
            Value::Object(map) => Ok(Patch::from(map)),
            other => Err(PatchError::invalid_shape(value_type_name(&other))),
        }
    }
}

impl Patch<Value> {
    /// Render the patch back into plain JSON.
    ///
    /// Branches become objects, leaves keep their values. Round-trips
    /// with [`Patch::from`] for any JSON object.
    pub fn to_value(&self) -> Value {
        let mut map = Map::new();
        for (key, node) in &self.nodes {
            let value = match node {
                PatchNode::Branch(inner) => inner.to_value(),
                PatchNode::Leaf(leaf) => leaf.clone(),
            };
            map.insert(key.clone(), value);
        }
        Value::Object(map)
    }
}

impl Serialize for Patch<Value> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.to_value().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Patch<Value> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        Patch::try_from(value).map_err(serde::de::Error::custom)
    }
}

/// A leaf that computes the next value from the current one.
///
/// Used by [`reduce_nodes`](crate::reduce_nodes): each leaf receives the
/// state value at its own location, or `None` when the state has nothing
/// there, and returns the replacement.
pub struct NodeFn(Box<dyn Fn(Option<&Value>) -> Value + Send + Sync>);

impl NodeFn {
    /// Wrap a function as a leaf.
    pub fn new(f: impl Fn(Option<&Value>) -> Value + Send + Sync + 'static) -> Self {
        NodeFn(Box::new(f))
    }

    /// Apply the leaf to the state value at its location.
    #[inline]
    pub fn call(&self, current: Option<&Value>) -> Value {
        (self.0)(current)
    }
}

impl fmt::Debug for NodeFn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("NodeFn").field(&"<fn>").finish()
    }
}

/// Construct a [`Patch`] of [`Value`] leaves from a literal description.
///
/// Brace values become nested branches; any other value is a single
/// token tree handed to [`json!`](crate::json), so literals, arrays, and
/// identifiers all work as leaves (parenthesize anything more complex).
///
/// # Examples
///
/// ```
/// use patchtree::patch;
/// use serde_json::json;
///
/// let todo = "restock";
/// let p = patch! {
///     "todos": [todo],
///     "meta": { "dirty": true },
/// };
///
/// assert_eq!(p.to_value(), json!({
///     "todos": ["restock"],
///     "meta": {"dirty": true},
/// }));
/// ```
#[macro_export]
macro_rules! patch {
    () => {
        $crate::Patch::new()
    };
    ($($key:tt : $node:tt),+ $(,)?) => {{
        let mut patch = $crate::Patch::new();
        $(
            patch.insert($key, $crate::patch!(@node $node));
        )+
        patch
    }};
    (@node { $($inner:tt)* }) => {
        $crate::PatchNode::branch($crate::patch! { $($inner)* })
    };
    (@node $leaf:tt) => {
        $crate::PatchNode::leaf($crate::json!($leaf))
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_builder_and_accessors() {
        let patch: Patch<Value> = Patch::new()
            .with_leaf("count", 1)
            .with_branch("meta", Patch::new().with_leaf("dirty", true));

        assert_eq!(patch.len(), 2);
        assert!(!patch.is_empty());
        assert!(patch.contains_key("count"));
        assert!(patch.get("count").is_some_and(|n| n.is_leaf()));
        assert!(patch.get("meta").is_some_and(|n| n.is_branch()));
        assert_eq!(
            patch.get("count").and_then(|n| n.as_leaf()),
            Some(&json!(1))
        );
        assert!(patch.get("missing").is_none());
    }

    #[test]
    fn test_keys_are_sorted() {
        let patch: Patch<Value> = Patch::new()
            .with_leaf("zebra", 1)
            .with_leaf("apple", 2)
            .with_leaf("mango", 3);

        let keys: Vec<&str> = patch.keys().collect();
        assert_eq!(keys, vec!["apple", "mango", "zebra"]);
    }

    #[test]
    fn test_insert_replaces() {
        let mut patch: Patch<Value> = Patch::new().with_leaf("a", 1);
        patch.insert("a", PatchNode::leaf(json!(2)));

        assert_eq!(patch.len(), 1);
        assert_eq!(patch.get("a").and_then(|n| n.as_leaf()), Some(&json!(2)));
    }

    #[test]
    fn test_merge_replaces_same_keys() {
        let mut base: Patch<Value> = Patch::new().with_leaf("a", 1).with_leaf("b", 2);
        base.merge(Patch::new().with_leaf("b", 20).with_leaf("c", 30));

        assert_eq!(base.to_value(), json!({"a": 1, "b": 20, "c": 30}));
    }

    #[test]
    fn test_from_map_splits_objects_into_branches() {
        let value = json!({
            "name": "x",
            "nested": {"flag": true, "deeper": {"n": 1}},
            "items": [1, 2],
        });
        let Value::Object(map) = value else {
            unreachable!()
        };
        let patch = Patch::from(map);

        assert!(patch.get("name").is_some_and(|n| n.is_leaf()));
        // Arrays are leaves, not branches.
        assert!(patch.get("items").is_some_and(|n| n.is_leaf()));

        let nested = patch.get("nested").and_then(|n| n.as_branch()).unwrap();
        assert!(nested.get("flag").is_some_and(|n| n.is_leaf()));
        assert!(nested.get("deeper").is_some_and(|n| n.is_branch()));
    }

    #[test]
    fn test_try_from_rejects_non_objects() {
        for value in [json!(null), json!(true), json!(3), json!("s"), json!([1])] {
            let expected = value_type_name(&value);
            let err = Patch::try_from(value).unwrap_err();
            assert!(matches!(
                err,
                PatchError::InvalidPatchShape { found } if found == expected
            ));
        }
    }

    #[test]
    fn test_to_value_round_trip() {
        let original = json!({
            "a": 1,
            "b": {"c": [1, 2], "d": {"e": null}},
        });
        let Value::Object(map) = original.clone() else {
            unreachable!()
        };
        assert_eq!(Patch::from(map).to_value(), original);
    }

    #[test]
    fn test_serde_round_trip() {
        let patch: Patch<Value> = Patch::new()
            .with_leaf("items", json!([1, 2]))
            .with_branch("meta", Patch::new().with_leaf("dirty", true));

        let text = serde_json::to_string(&patch).unwrap();
        let parsed: Patch<Value> = serde_json::from_str(&text).unwrap();
        assert_eq!(parsed, patch);
    }

    #[test]
    fn test_deserialize_rejects_non_object() {
        let result: Result<Patch<Value>, _> = serde_json::from_str("[1, 2]");
        assert!(result.is_err());
    }

    #[test]
    fn test_from_iterator_and_extend() {
        let mut patch: Patch<Value> = [("a".to_string(), PatchNode::leaf(json!(1)))]
            .into_iter()
            .collect();
        patch.extend([("b".to_string(), PatchNode::leaf(json!(2)))]);

        assert_eq!(patch.to_value(), json!({"a": 1, "b": 2}));
    }

    #[test]
    fn test_macro_matches_builder() {
        let via_macro = crate::patch! {
            "count": 1,
            "meta": { "dirty": true, "tags": ["a", "b"] },
        };
        let via_builder: Patch<Value> = Patch::new().with_leaf("count", 1).with_branch(
            "meta",
            Patch::new()
                .with_leaf("dirty", true)
                .with_leaf("tags", json!(["a", "b"])),
        );

        assert_eq!(via_macro, via_builder);
    }

    #[test]
    fn test_macro_empty() {
        let patch: Patch<Value> = crate::patch! {};
        assert!(patch.is_empty());
        assert_eq!(patch.to_value(), json!({}));
    }

    #[test]
    fn test_node_fn_receives_current_value() {
        let double = NodeFn::new(|current| {
            json!(current.and_then(Value::as_i64).unwrap_or(0) * 2)
        });

        assert_eq!(double.call(Some(&json!(21))), json!(42));
        assert_eq!(double.call(None), json!(0));
        assert_eq!(format!("{double:?}"), "NodeFn(\"<fn>\")");
    }
}
