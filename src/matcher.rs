use crate::{Effect, Value};

/// Outcome of a single matcher invocation.
#[derive(Debug, Clone, PartialEq)]
pub struct Verdict {
    matched: bool,
    effect: Option<Effect>,
    short_circuit: bool,
}

impl Verdict {
    pub fn new(matched: bool, effect: Option<Effect>, short_circuit: bool) -> Self {
        Self {
            matched,
            effect,
            short_circuit,
        }
    }

    /// The rule does not apply to the request.
    pub fn no_match() -> Self {
        Self::new(false, None, false)
    }

    /// The rule applies but leaves the decision to other rules.
    pub fn abstain() -> Self {
        Self::new(true, None, false)
    }

    /// The rule applies with `effect`; later rules at the same level may override it.
    pub fn matched(effect: Effect) -> Self {
        Self::new(true, Some(effect), false)
    }

    /// The rule applies with `effect` and no further rules at its level are consulted.
    pub fn decisive(effect: Effect) -> Self {
        Self::new(true, Some(effect), true)
    }

    pub fn is_match(&self) -> bool {
        self.matched
    }

    pub fn effect(&self) -> Option<&Effect> {
        self.effect.as_ref()
    }

    pub fn is_short_circuit(&self) -> bool {
        self.short_circuit
    }

    /// The effect this verdict contributes to its level, if any.
    pub(crate) fn into_decision(self) -> Option<(Effect, bool)> {
        match self {
            Verdict {
                matched: true,
                effect: Some(effect),
                short_circuit,
            } => Some((effect, short_circuit)),
            _ => None,
        }
    }
}

/// Business logic attached to a rule.
///
/// A matcher always receives the values of the query, never the rule's
/// templates, whichever cascade level selected the rule. Downcasting the
/// values to domain types is up to the implementation.
pub trait Matcher: Send + Sync {
    fn do_match(&self, subject: &Value, action: &Value, resource: &Value) -> Verdict;
}

impl<F> Matcher for F
where
    F: Fn(&Value, &Value, &Value) -> Verdict + Send + Sync,
{
    fn do_match(&self, subject: &Value, action: &Value, resource: &Value) -> Verdict {
        self(subject, action, resource)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    struct ActionIs(&'static str);

    impl Matcher for ActionIs {
        fn do_match(&self, _subject: &Value, action: &Value, _resource: &Value) -> Verdict {
            if action.as_str() == Some(self.0) {
                Verdict::matched(Effect::ALLOW)
            } else {
                Verdict::no_match()
            }
        }
    }

    #[test_case(Verdict::no_match(), None ; "no match")]
    #[test_case(Verdict::abstain(), None ; "abstain")]
    #[test_case(Verdict::new(false, Some(Effect::ALLOW), true), None ; "unmatched effect is ignored")]
    #[test_case(Verdict::matched(Effect::DENY), Some((Effect::DENY, false)) ; "matched")]
    #[test_case(Verdict::decisive(Effect::ALLOW), Some((Effect::ALLOW, true)) ; "decisive")]
    fn decision_of_verdict(verdict: Verdict, expected: Option<(Effect, bool)>) {
        assert_eq!(expected, verdict.into_decision());
    }

    #[test]
    fn closures_are_matchers() {
        let matcher = |_: &Value, _: &Value, resource: &Value| match resource.as_bool() {
            Some(true) => Verdict::decisive(Effect::ALLOW),
            _ => Verdict::abstain(),
        };

        let subject = Value::from("jack");
        let action = Value::from("view");
        assert_eq!(
            Verdict::decisive(Effect::ALLOW),
            matcher.do_match(&subject, &action, &Value::from(true))
        );
        assert_eq!(
            Verdict::abstain(),
            matcher.do_match(&subject, &action, &Value::from(false))
        );
    }

    #[test]
    fn custom_matcher() {
        let matcher: &dyn Matcher = &ActionIs("view");
        let subject = Value::from("jack");
        let resource = Value::from(1);

        assert!(matcher.do_match(&subject, &"view".into(), &resource).is_match());
        assert!(!matcher.do_match(&subject, &"modify".into(), &resource).is_match());
    }
}
