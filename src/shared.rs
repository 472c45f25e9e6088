use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::{Effect, Evaluation, Rule, RuleSet, Value, Verdict};

/// A `RuleSet` that accepts new rules while other threads query it.
///
/// Registration takes the write lock, queries take the read lock. Rules are
/// only ever appended, so a poisoned lock still guards a consistent index
/// and is recovered.
#[derive(Debug)]
pub struct SharedRuleSet {
    inner: RwLock<RuleSet>,
}

impl SharedRuleSet {
    pub fn new(rules: RuleSet) -> Self {
        Self {
            inner: RwLock::new(rules),
        }
    }

    pub fn add_rule<F>(
        &self,
        subject: Option<Value>,
        action: Option<Value>,
        resource: Option<Value>,
        matcher: F,
    ) where
        F: Fn(&Value, &Value, &Value) -> Verdict + Send + Sync + 'static,
    {
        self.write().add_rule(subject, action, resource, matcher);
    }

    pub fn add(&self, rule: Rule) {
        self.write().add(rule);
    }

    pub fn query(&self, subject: &Value, action: &Value, resource: &Value) -> Effect {
        self.read().query(subject, action, resource)
    }

    pub fn evaluate(&self, subject: &Value, action: &Value, resource: &Value) -> Evaluation {
        self.read().evaluate(subject, action, resource)
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    pub fn into_inner(self) -> RuleSet {
        self.inner
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn read(&self) -> RwLockReadGuard<'_, RuleSet> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, RuleSet> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl From<RuleSet> for SharedRuleSet {
    fn from(rules: RuleSet) -> Self {
        Self::new(rules)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::policy::tests::{archive, media_rules, playlist, user};
    use std::{sync::Arc, thread};

    #[test]
    fn rule_sets_are_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}

        assert_send_sync::<RuleSet>();
        assert_send_sync::<SharedRuleSet>();
    }

    #[test]
    fn concurrent_queries_on_built_rule_set() {
        let rules = Arc::new(media_rules());

        let handles: Vec<_> = (0..4)
            .map(|_| {
                let rules = Arc::clone(&rules);
                thread::spawn(move || {
                    let resource = playlist("jack", "editors", false);
                    (0..100)
                        .map(|_| rules.query(&user("jack"), &"view".into(), &resource))
                        .all(|effect| effect == Effect::ALLOW)
                })
            })
            .collect();

        for handle in handles {
            assert!(handle.join().unwrap());
        }
    }

    #[test]
    fn registration_interleaved_with_queries() {
        let rules = Arc::new(SharedRuleSet::new(RuleSet::new(Effect::DENY)));
        assert_eq!(Effect::DENY, rules.query(&user("jack"), &"view".into(), &archive("a")));

        let writer = {
            let rules = Arc::clone(&rules);
            thread::spawn(move || {
                rules.add_rule(None, Some("view".into()), None, |_, _, _| {
                    Verdict::matched(Effect::ALLOW)
                });
            })
        };
        writer.join().unwrap();

        assert_eq!(1, rules.len());
        assert_eq!(Effect::ALLOW, rules.query(&user("jack"), &"view".into(), &archive("a")));
        assert!(!rules.evaluate(&user("jack"), &"view".into(), &archive("a")).is_default());
    }

    #[test]
    fn panicking_matcher_leaves_rule_set_usable() {
        let rules = Arc::new(SharedRuleSet::new(RuleSet::new(Effect::DENY)));
        rules.add_rule(None, None, None, |_, _, _| panic!("matcher failure"));

        let querier = {
            let rules = Arc::clone(&rules);
            thread::spawn(move || rules.query(&user("jack"), &"view".into(), &archive("a")))
        };
        assert!(querier.join().is_err());

        rules.add(Rule::new(None, None, None));
        assert_eq!(2, rules.len());
    }

    #[test]
    fn into_inner_returns_rule_set() {
        let shared = SharedRuleSet::from(media_rules());
        let rules = shared.into_inner();

        assert_eq!(5, rules.len());
    }
}
