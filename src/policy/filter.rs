//! Value compatibility between rule templates and query values.
//!
//! The index only guarantees that a candidate's template kinds line up with
//! the query. Here a candidate is dropped when one of its templates pins a
//! concrete value that the query does not carry. Empty or zero templates act
//! as "any value of this kind", and entity templates are type markers that
//! never pin a value.

use crate::{Kind, Value};

use super::Rule;

/// Whether `template` accepts `value` at a single position.
pub fn admits_value(template: Option<&Value>, value: &Value) -> bool {
    let template = match template {
        Some(template) => template,
        None => return true,
    };

    let kind = value.kind();
    if Kind::of(Some(template)) != kind || !kind.compares_by_value() || template.is_zero() {
        return true;
    }

    template == value
}

/// Whether all three templates of `rule` accept the query.
pub fn admits(rule: &Rule, subject: &Value, action: &Value, resource: &Value) -> bool {
    admits_value(rule.subject(), subject)
        && admits_value(rule.action(), action)
        && admits_value(rule.resource(), resource)
}

/// Rules of a kind-matched bucket that also accept the query values, in order.
pub fn candidates<'a>(
    rules: &'a [Rule],
    subject: &'a Value,
    action: &'a Value,
    resource: &'a Value,
) -> impl Iterator<Item = &'a Rule> + 'a {
    rules
        .iter()
        .filter(move |rule| admits(rule, subject, action, resource))
}
