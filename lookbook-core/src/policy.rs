//! Operator authorization
//!
//! Decides which senders may register photos. Everyone else gets search.

use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Identity of a message sender, as reported by the transport.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SenderId(String);

impl SenderId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SenderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SenderId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for SenderId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Predicate deciding whether a sender acts as a catalog operator.
pub trait OperatorPolicy: Send + Sync {
    fn is_operator(&self, sender: &SenderId) -> bool;
}

impl<F> OperatorPolicy for F
where
    F: Fn(&SenderId) -> bool + Send + Sync,
{
    fn is_operator(&self, sender: &SenderId) -> bool {
        self(sender)
    }
}

/// Fixed set of operator identities.
#[derive(Debug, Clone, Default)]
pub struct OperatorAllowList {
    operators: HashSet<SenderId>,
}

impl OperatorAllowList {
    pub fn new<I, S>(operators: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<SenderId>,
    {
        Self {
            operators: operators.into_iter().map(Into::into).collect(),
        }
    }

    /// Single designated operator.
    pub fn single(operator: impl Into<SenderId>) -> Self {
        Self::new([operator])
    }

    pub fn len(&self) -> usize {
        self.operators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.operators.is_empty()
    }
}

impl OperatorPolicy for OperatorAllowList {
    fn is_operator(&self, sender: &SenderId) -> bool {
        self.operators.contains(sender)
    }
}

/// Policy with no operators: every image is a search.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOperators;

impl OperatorPolicy for NoOperators {
    fn is_operator(&self, _sender: &SenderId) -> bool {
        false
    }
}
