use std::{sync::Arc, thread};

use perms::{Effect, Result, RuleSet, SharedRuleSet, Value, Verdict};

fn main() -> Result<()> {
    let rules = RuleSet::builder()
        .with_default_effect(Effect::new("ask")?)
        .build()?;
    let rules = Arc::new(SharedRuleSet::from(rules));

    let readers: Vec<_> = (0..4)
        .map(|id| {
            let rules = Arc::clone(&rules);
            thread::spawn(move || {
                let subject = Value::from(format!("reader-{}", id));
                let effect = rules.query(&subject, &"read".into(), &"/shared/notes.txt".into());
                println!("{:?} read => {}", subject, effect);
            })
        })
        .collect();

    // Strings compare by value: this rule only applies to the "read" action.
    rules.add_rule(None, Some("read".into()), None, |_, _, resource| {
        match resource.as_str() {
            Some(path) if path.starts_with("/shared/") => Verdict::matched(Effect::ALLOW),
            _ => Verdict::no_match(),
        }
    });

    for reader in readers {
        reader.join().expect("reader thread panicked");
    }

    let effect = rules.query(&"late-reader".into(), &"read".into(), &"/shared/notes.txt".into());
    assert_eq!(Effect::ALLOW, effect);
    println!("late-reader read => {}", effect);

    Ok(())
}
