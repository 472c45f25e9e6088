use serde::{Deserialize, Serialize};

use crate::{Effect, Error, Result, Rule, RuleSet};

/// Rule set settings document.
///
/// ```json
/// { "defaultEffect": "deny" }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    #[serde(default)]
    pub default_effect: Option<Effect>,
}

/// Assembles a `RuleSet`, refusing to build one without a default effect.
#[derive(Default)]
pub struct RuleSetBuilder {
    json: Option<String>,
    default_effect: Option<Effect>,
    rules: Vec<Rule>,
}

impl RuleSetBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts from a JSON settings document. It is parsed by `build`.
    pub fn from_json(json: &str) -> Self {
        Self {
            json: Some(json.into()),
            ..Self::default()
        }
    }

    /// Sets the default effect, taking precedence over the settings document.
    pub fn with_default_effect(mut self, effect: Effect) -> Self {
        self.default_effect = Some(effect);
        self
    }

    /// Queues a rule; rules are registered in the order they were queued.
    pub fn with_rule(mut self, rule: Rule) -> Self {
        self.rules.push(rule);
        self
    }

    pub fn build(self) -> Result<RuleSet> {
        let settings: Settings = match &self.json {
            Some(json) => serde_json::from_str(json).map_err(Error::Deserializing)?,
            None => Settings::default(),
        };

        let default_effect = self
            .default_effect
            .or(settings.default_effect)
            .ok_or(Error::MissingDefaultEffect)?;

        let mut rules = RuleSet::new(default_effect);
        for rule in self.rules {
            rules.add(rule);
        }
        Ok(rules)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{policy::tests::user, Value, Verdict};
    use assert_matches::assert_matches;

    #[test]
    fn build_without_default_effect_fails() {
        assert_matches!(
            RuleSetBuilder::new().build(),
            Err(Error::MissingDefaultEffect)
        );
        assert_matches!(
            RuleSetBuilder::from_json("{}").build(),
            Err(Error::MissingDefaultEffect)
        );
    }

    #[test]
    fn default_effect_from_json() {
        let rules = RuleSetBuilder::from_json(r#"{ "defaultEffect": "deny" }"#)
            .build()
            .expect("Unable to build rule set from json.");

        assert_eq!(&Effect::DENY, rules.default_effect());
        assert!(rules.is_empty());
    }

    #[test]
    fn explicit_default_effect_wins_over_json() {
        let rules = RuleSet::builder()
            .with_default_effect(Effect::ALLOW)
            .build()
            .expect("Unable to build rule set.");
        assert_eq!(&Effect::ALLOW, rules.default_effect());

        let rules = RuleSetBuilder::from_json(r#"{ "defaultEffect": "deny" }"#)
            .with_default_effect(Effect::ALLOW)
            .build()
            .expect("Unable to build rule set from json.");
        assert_eq!(&Effect::ALLOW, rules.default_effect());
    }

    #[test]
    fn invalid_settings_are_rejected() {
        assert_matches!(
            RuleSetBuilder::from_json("not json").build(),
            Err(Error::Deserializing(_))
        );
        assert_matches!(
            RuleSetBuilder::from_json(r#"{ "defaultEffect": "" }"#).build(),
            Err(Error::Deserializing(_))
        );
    }

    fn view_rule(effect: Effect) -> Rule {
        Rule::new(None, Some("view".into()), None)
            .with_matcher(move |_: &Value, _: &Value, _: &Value| Verdict::matched(effect.clone()))
    }

    #[test]
    fn queued_rules_keep_order() {
        let rules = RuleSet::builder()
            .with_default_effect(Effect::DENY)
            .with_rule(view_rule(Effect::DENY))
            .with_rule(view_rule(Effect::ALLOW))
            .build()
            .expect("Unable to build rule set.");

        assert_eq!(2, rules.len());
        assert_eq!(
            Effect::ALLOW,
            rules.query(&user("jack"), &"view".into(), &Value::from(1))
        );
    }

    #[test]
    fn settings_round_trip_through_json() {
        let settings = Settings {
            default_effect: Some(Effect::DENY),
        };
        let json = serde_json::to_string(&settings).unwrap();

        assert_eq!(r#"{"defaultEffect":"deny"}"#, json);
    }
}
