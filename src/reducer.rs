//! The reducer values produced by the combinators.

use std::fmt;

use serde_json::Value;

/// A pure state transition: current state in, next state out.
///
/// Every combinator action builds one of these. The state container
/// calls [`reduce`](Reducer::reduce), swaps in the returned value, and
/// drops the reducer. The input is never modified and the output shares
/// no structure with it.
pub struct Reducer(Box<dyn Fn(&Value) -> Value + Send + Sync>);

impl Reducer {
    /// Wrap a function as a reducer.
    pub fn new(f: impl Fn(&Value) -> Value + Send + Sync + 'static) -> Self {
        Reducer(Box::new(f))
    }

    /// Produce the next state from the current one.
    #[inline]
    pub fn reduce(&self, state: &Value) -> Value {
        (self.0)(state)
    }

    /// The reducer that returns the state unchanged.
    pub fn identity() -> Self {
        Reducer::new(Value::clone)
    }

    /// Chain another reducer after this one.
    ///
    /// `a.then(b)` reduces with `a`, then feeds the result to `b`.
    pub fn then(self, next: Reducer) -> Reducer {
        Reducer::new(move |state| next.reduce(&self.reduce(state)))
    }
}

impl fmt::Debug for Reducer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Reducer").field(&"<fn>").finish()
    }
}
