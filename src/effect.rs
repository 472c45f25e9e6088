use std::{borrow::Cow, convert::TryFrom, fmt};

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Decision label produced by a rule set, e.g. `"allow"` or `"deny"`.
///
/// An `Effect` is never empty. Matchers and cascade levels that reach
/// no decision report `None` instead.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Effect(Cow<'static, str>);

impl Effect {
    pub const ALLOW: Effect = Effect(Cow::Borrowed("allow"));
    pub const DENY: Effect = Effect(Cow::Borrowed("deny"));

    /// Creates an effect from a non-empty label.
    pub fn new(label: impl Into<Cow<'static, str>>) -> Result<Self> {
        let label = label.into();
        if label.is_empty() {
            return Err(Error::EmptyEffect);
        }

        Ok(Self(label))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_allow(&self) -> bool {
        *self == Effect::ALLOW
    }

    pub fn is_deny(&self) -> bool {
        *self == Effect::DENY
    }
}

impl fmt::Display for Effect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for Effect {
    type Error = Error;

    fn try_from(label: String) -> Result<Self> {
        Effect::new(label)
    }
}

impl TryFrom<&'static str> for Effect {
    type Error = Error;

    fn try_from(label: &'static str) -> Result<Self> {
        Effect::new(label)
    }
}

impl From<Effect> for String {
    fn from(effect: Effect) -> Self {
        effect.0.into_owned()
    }
}

impl PartialEq<str> for Effect {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for Effect {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}
