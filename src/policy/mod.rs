mod builder;
pub mod filter;
mod index;

pub use builder::{RuleSetBuilder, Settings};
pub use index::{KindTriple, RuleIndex};

use std::{fmt, sync::Arc};

use tracing::{debug, trace};

use crate::{Effect, Kind, Matcher, Value, Verdict};

/// Templates and business logic of a single permission rule.
///
/// An absent template matches any value at its position. A present template
/// restricts the rule to values of the same kind, and to an equal value when
/// the template is a non-zero primitive or record. Rules are immutable once
/// created.
#[derive(Clone)]
pub struct Rule {
    subject: Option<Value>,
    action: Option<Value>,
    resource: Option<Value>,
    matcher: Option<Arc<dyn Matcher>>,
}

impl Rule {
    /// Creates a rule without a matcher. It never decides until one is attached.
    pub fn new(subject: Option<Value>, action: Option<Value>, resource: Option<Value>) -> Self {
        Self {
            subject,
            action,
            resource,
            matcher: None,
        }
    }

    pub fn with_matcher<M>(mut self, matcher: M) -> Self
    where
        M: Matcher + 'static,
    {
        self.matcher = Some(Arc::new(matcher));
        self
    }

    pub fn subject(&self) -> Option<&Value> {
        self.subject.as_ref()
    }

    pub fn action(&self) -> Option<&Value> {
        self.action.as_ref()
    }

    pub fn resource(&self) -> Option<&Value> {
        self.resource.as_ref()
    }

    pub fn matcher(&self) -> Option<&dyn Matcher> {
        self.matcher.as_deref()
    }

    pub fn kinds(&self) -> KindTriple {
        (
            Kind::of(self.subject()),
            Kind::of(self.action()),
            Kind::of(self.resource()),
        )
    }
}

impl fmt::Debug for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Rule")
            .field("subject", &self.subject)
            .field("action", &self.action)
            .field("resource", &self.resource)
            .field("matcher", &self.matcher.is_some())
            .finish()
    }
}

/// Template positions kept by one step of the specificity cascade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Level {
    SubjectActionResource,
    SubjectAction,
    SubjectResource,
    ActionResource,
    Subject,
    Resource,
    Action,
    Any,
}

impl Level {
    /// Levels in the order a query tries them, most specific first.
    pub const CASCADE: [Level; 8] = [
        Level::SubjectActionResource,
        Level::SubjectAction,
        Level::SubjectResource,
        Level::ActionResource,
        Level::Subject,
        Level::Resource,
        Level::Action,
        Level::Any,
    ];

    /// Which of subject, action and resource keep their kind at this level.
    pub fn positions(self) -> (bool, bool, bool) {
        match self {
            Level::SubjectActionResource => (true, true, true),
            Level::SubjectAction => (true, true, false),
            Level::SubjectResource => (true, false, true),
            Level::ActionResource => (false, true, true),
            Level::Subject => (true, false, false),
            Level::Resource => (false, false, true),
            Level::Action => (false, true, false),
            Level::Any => (false, false, false),
        }
    }

    /// Index key for this level; dropped positions become wildcards.
    pub fn template(self, (subject, action, resource): KindTriple) -> KindTriple {
        let keep = |kept: bool, kind: Kind| if kept { kind } else { Kind::Wildcard };
        let (s, a, r) = self.positions();
        (keep(s, subject), keep(a, action), keep(r, resource))
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mark = |kept: bool, c: char| if kept { c } else { '-' };
        let (s, a, r) = self.positions();
        write!(f, "({},{},{})", mark(s, 'S'), mark(a, 'A'), mark(r, 'R'))
    }
}

/// Effect of a query and the cascade level that produced it.
///
/// `level` is `None` when no level decided and the default effect applied.
#[derive(Debug, Clone, PartialEq)]
pub struct Evaluation {
    pub effect: Effect,
    pub level: Option<Level>,
}

impl Evaluation {
    pub fn is_default(&self) -> bool {
        self.level.is_none()
    }
}

/// A set of permission rules and the effect returned when none of them decides.
///
/// Registration takes `&mut self` and querying `&self`, so a `RuleSet` can be
/// shared between threads for querying once it is fully built. Use
/// [`SharedRuleSet`](crate::SharedRuleSet) to keep registering while querying.
///
/// Within one cascade level, rules run in registration order and the last
/// matching rule with an effect wins unless an earlier one short-circuits.
/// Callers relying on overrides should register the overriding rule last.
pub struct RuleSet {
    index: RuleIndex,
    default_effect: Effect,
}

impl RuleSet {
    pub fn new(default_effect: Effect) -> Self {
        Self {
            index: RuleIndex::new(),
            default_effect,
        }
    }

    pub fn builder() -> RuleSetBuilder {
        RuleSetBuilder::new()
    }

    /// Registers a rule. Pass `None` for a template to match any value at that position.
    pub fn add_rule<F>(
        &mut self,
        subject: Option<Value>,
        action: Option<Value>,
        resource: Option<Value>,
        matcher: F,
    ) where
        F: Fn(&Value, &Value, &Value) -> Verdict + Send + Sync + 'static,
    {
        self.add(Rule::new(subject, action, resource).with_matcher(matcher));
    }

    /// Registers a prepared rule.
    pub fn add(&mut self, rule: Rule) {
        self.index.insert(rule);
    }

    /// Evaluates the triple, falling back to the default effect.
    pub fn query(&self, subject: &Value, action: &Value, resource: &Value) -> Effect {
        self.evaluate(subject, action, resource).effect
    }

    /// Evaluates the triple and reports which cascade level decided.
    pub fn evaluate(&self, subject: &Value, action: &Value, resource: &Value) -> Evaluation {
        let kinds = (subject.kind(), action.kind(), resource.kind());
        debug!(subject = %kinds.0, action = %kinds.1, resource = %kinds.2, "evaluating query");
        trace!(?subject, ?action, ?resource, "query values");

        for &level in &Level::CASCADE {
            if let Some(effect) = self.evaluate_level(level, kinds, subject, action, resource) {
                debug!(%level, %effect, "query decided");
                return Evaluation {
                    effect,
                    level: Some(level),
                };
            }
        }

        debug!(effect = %self.default_effect, "no rule decided, using default effect");
        Evaluation {
            effect: self.default_effect.clone(),
            level: None,
        }
    }

    fn evaluate_level(
        &self,
        level: Level,
        kinds: KindTriple,
        subject: &Value,
        action: &Value,
        resource: &Value,
    ) -> Option<Effect> {
        let (s, a, r) = level.template(kinds);
        let bucket = self.index.lookup(s, a, r);
        if bucket.is_empty() {
            return None;
        }
        trace!(%level, candidates = bucket.len(), "evaluating level");

        let rules = filter::candidates(bucket, subject, action, resource);
        evaluate_rules(rules, subject, action, resource)
    }

    pub fn default_effect(&self) -> &Effect {
        &self.default_effect
    }

    pub fn index(&self) -> &RuleIndex {
        &self.index
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }
}

impl fmt::Debug for RuleSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RuleSet")
            .field("rules", &self.index.len())
            .field("default_effect", &self.default_effect)
            .finish()
    }
}

/// Runs the matchers of one level's candidates and combines their verdicts.
///
/// Later effects overwrite earlier ones; a short-circuiting verdict stops the level.
pub fn evaluate_rules<'a, I>(
    rules: I,
    subject: &Value,
    action: &Value,
    resource: &Value,
) -> Option<Effect>
where
    I: IntoIterator<Item = &'a Rule>,
{
    let mut result = None;
    for rule in rules {
        let matcher = match rule.matcher() {
            Some(matcher) => matcher,
            None => continue,
        };

        if let Some((effect, short_circuit)) =
            matcher.do_match(subject, action, resource).into_decision()
        {
            if short_circuit {
                return Some(effect);
            }
            result = Some(effect);
        }
    }
    result
}
