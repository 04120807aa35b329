//! Reducer combinators over immutable JSON state.
//!
//! `patchtree` builds store actions out of small declarative pieces. An
//! action is a function from arguments to a [`Reducer`]; a reducer takes
//! the current state and returns the next one without touching the
//! input. Instead of writing each reducer by hand, you describe *where*
//! a change applies with a [`Patch`] tree shaped like the state, pick a
//! combinator that fixes *how* leaves combine, and get the action for
//! free.
//!
//! # Core Concepts
//!
//! - **Patch**: a tree of keyed changes mirroring the state's shape.
//!   Branches descend into nested objects; leaves carry the payload for
//!   one location.
//! - **Iteratee**: the leaf-combining rule. [`patch_tree`] walks patch
//!   and state in lockstep and calls it with each patch leaf and the
//!   state value at the same spot (or `None` when the state has none).
//! - **Reducer**: the resulting pure transition. Reducers are built per
//!   action call, applied by the store, and dropped.
//! - **Combinators**: [`push_items`] appends to sequences,
//!   [`remove_items`] / [`remove_item`] filter them, [`reduce_nodes`]
//!   maps each leaf through its own function, and [`shallow`] overwrites
//!   top-level fields while keeping the rest of the state.
//!
//! # State Transitions
//!
//! ```text
//! next = action(args).reduce(&state)
//! ```
//!
//! - `state` is never modified; every application builds a fresh value.
//! - Tree combinators return exactly the keys their patch names. They
//!   are meant to run against the slice of state the action owns, with
//!   the store (or [`shallow`]) merging the slice back.
//! - Applying the same reducer to the same state always yields the same
//!   result.
//!
//! # Quick Start
//!
//! ```
//! use patchtree::{patch, push_items, shallow, Map, Value};
//! use serde_json::json;
//!
//! // Append into a sequence.
//! let add_todo = push_items(|todo: &str| patch! { "todos": [todo] });
//!
//! let state = json!({"todos": ["write docs"]});
//! let state = add_todo("cut release").reduce(&state);
//! assert_eq!(state, json!({"todos": ["write docs", "cut release"]}));
//!
//! // Overwrite one field, keeping the rest of the state.
//! let set_name = shallow(|_state: &Value, name: &String| {
//!     let mut fields = Map::new();
//!     fields.insert("name".into(), json!(name));
//!     fields
//! });
//!
//! let state = json!({"count": 1, "name": "x"});
//! let state = set_name("y".to_string()).reduce(&state);
//! assert_eq!(state, json!({"count": 1, "name": "y"}));
//! ```

mod combinators;
mod error;
mod patch;
mod reducer;
mod tree;

pub use combinators::{push_items, reduce_nodes, remove_item, remove_items, shallow};
pub use error::{value_type_name, PatchError, PatchResult};
pub use patch::{NodeFn, Patch, PatchNode};
pub use reducer::Reducer;
pub use tree::patch_tree;

// Re-export the serde_json types the public surface speaks.
pub use serde_json::{json, Map, Value};
