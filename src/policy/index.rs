use std::collections::{hash_map::Entry, HashMap};

use tracing::trace;

use crate::Kind;

use super::Rule;

/// Subject, action and resource kinds of a rule or query.
pub type KindTriple = (Kind, Kind, Kind);

/// Rules keyed by the kinds of their three templates.
///
/// Each bucket keeps its rules in registration order and is never empty.
#[derive(Default)]
pub struct RuleIndex {
    buckets: HashMap<KindTriple, Vec<Rule>>,
    len: usize,
}

impl RuleIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `rule` to the bucket of its template kinds.
    pub fn insert(&mut self, rule: Rule) {
        let kinds = rule.kinds();
        trace!(subject = %kinds.0, action = %kinds.1, resource = %kinds.2, "indexing rule");

        match self.buckets.entry(kinds) {
            Entry::Vacant(item) => {
                item.insert(vec![rule]);
            }
            Entry::Occupied(mut item) => item.get_mut().push(rule),
        }
        self.len += 1;
    }

    /// Rules registered under exactly these kinds, in registration order.
    pub fn lookup(&self, subject: Kind, action: Kind, resource: Kind) -> &[Rule] {
        self.buckets
            .get(&(subject, action, resource))
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Number of rules across all buckets.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Kind triples that hold at least one rule.
    pub fn kind_triples(&self) -> impl Iterator<Item = &KindTriple> + '_ {
        self.buckets.keys()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Effect, Value, Verdict};

    #[derive(Debug, Default)]
    struct User;

    #[derive(Debug, Default)]
    struct Playlist;

    fn rule(action: &str, effect: &'static str) -> Rule {
        let effect = Effect::new(effect).unwrap();
        Rule::new(
            Some(Value::entity(User)),
            Some(action.into()),
            Some(Value::entity(Playlist)),
        )
        .with_matcher(move |_: &Value, _: &Value, _: &Value| Verdict::matched(effect.clone()))
    }

    fn labels(rules: &[Rule]) -> Vec<&str> {
        rules
            .iter()
            .filter_map(|rule| rule.action().and_then(Value::as_str))
            .collect()
    }

    #[test]
    fn lookup_absent_is_empty() {
        let index = RuleIndex::new();

        assert!(index.is_empty());
        assert!(index
            .lookup(Kind::Wildcard, Kind::Wildcard, Kind::Wildcard)
            .is_empty());
    }

    #[test]
    fn rules_share_bucket_by_kind() {
        let mut index = RuleIndex::new();
        index.insert(rule("view", "allow"));
        index.insert(rule("modify", "deny"));
        index.insert(rule("view", "deny"));

        let bucket = index.lookup(Kind::entity::<User>(), Kind::Str, Kind::entity::<Playlist>());
        assert_eq!(vec!["view", "modify", "view"], labels(bucket));
        assert_eq!(3, index.len());
        assert_eq!(1, index.kind_triples().count());
    }

    #[test]
    fn wildcard_templates_get_own_bucket() {
        let mut index = RuleIndex::new();
        index.insert(rule("view", "allow"));
        index.insert(Rule::new(Some(Value::entity(User)), Some("view".into()), None));
        index.insert(Rule::new(None, None, None));

        assert_eq!(3, index.kind_triples().count());
        assert_eq!(
            1,
            index
                .lookup(Kind::entity::<User>(), Kind::Str, Kind::Wildcard)
                .len()
        );
        assert_eq!(
            1,
            index
                .lookup(Kind::Wildcard, Kind::Wildcard, Kind::Wildcard)
                .len()
        );
        assert!(index
            .lookup(Kind::entity::<Playlist>(), Kind::Str, Kind::Wildcard)
            .is_empty());
    }
}
