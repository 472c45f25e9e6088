//! A permission library mapping `(subject, action, resource)` triples to
//! an effect such as `"allow"` or `"deny"`.
//!
//! Each rule carries optional subject, action and resource templates and a
//! matcher. Templates only decide where a rule is indexed and which queries
//! reach its matcher. The matcher then inspects the actual query values and
//! returns a [`Verdict`].
//!
//! A query tries the rules registered for the exact kinds of its values
//! first, then falls back through progressively more generic wildcard
//! registrations (see [`Level::CASCADE`]) and returns the rule set's
//! default effect when no level decides.
//!
//! ```
//! use perms::{Effect, RuleSet, Value, Verdict};
//!
//! #[derive(Debug, Default)]
//! struct User {
//!     name: String,
//! }
//!
//! #[derive(Debug, Default)]
//! struct Playlist {
//!     owner: String,
//! }
//!
//! let mut rules = RuleSet::new(Effect::DENY);
//! rules.add_rule(
//!     Some(Value::entity(User::default())),
//!     Some("view".into()),
//!     Some(Value::entity(Playlist::default())),
//!     |subject, _, resource| {
//!         match (subject.downcast_ref::<User>(), resource.downcast_ref::<Playlist>()) {
//!             (Some(user), Some(playlist)) if user.name == playlist.owner => {
//!                 Verdict::matched(Effect::ALLOW)
//!             }
//!             _ => Verdict::matched(Effect::DENY),
//!         }
//!     },
//! );
//!
//! let jack = Value::entity(User { name: "jack".into() });
//! let playlist = Value::entity(Playlist { owner: "jack".into() });
//! assert_eq!(Effect::ALLOW, rules.query(&jack, &"view".into(), &playlist));
//! assert_eq!(Effect::DENY, rules.query(&jack, &"delete".into(), &playlist));
//! ```
#![deny(rust_2018_idioms)]
#![deny(clippy::all, clippy::pedantic)]
#![allow(
    clippy::module_name_repetitions,
    clippy::must_use_candidate,
    clippy::missing_errors_doc,
    clippy::float_cmp,
    clippy::new_without_default
)]
mod effect;
mod errors;
mod matcher;
mod policy;
mod shared;
mod value;

pub use effect::Effect;
pub use errors::{Error, Result};
pub use matcher::{Matcher, Verdict};
pub use policy::filter;
pub use policy::{evaluate_rules, Evaluation, KindTriple, Level, Rule, RuleIndex, RuleSet};
pub use policy::{RuleSetBuilder, Settings};
pub use shared::SharedRuleSet;
pub use value::{Entity, Kind, Record, TypeKey, Value};
