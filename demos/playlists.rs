use perms::{Effect, RuleSet, Value, Verdict};

#[derive(Debug, Default)]
struct User {
    name: String,
    is_superuser: bool,
}

#[derive(Debug, Default)]
struct Group {
    name: String,
}

#[derive(Debug, Default)]
struct Playlist {
    public: bool,
    user: String,
    group: String,
}

#[derive(Debug, Default)]
struct Archive;

fn main() {
    // Anything not explicitly allowed is denied.
    let mut rules = RuleSet::new(Effect::DENY);

    // users can view their own and public playlists, superusers view everything.
    rules.add_rule(
        Some(Value::entity(User::default())),
        Some("view".into()),
        Some(Value::entity(Playlist::default())),
        |subject, _, resource| {
            match (subject.downcast_ref::<User>(), resource.downcast_ref::<Playlist>()) {
                (Some(user), _) if user.is_superuser => Verdict::decisive(Effect::ALLOW),
                (Some(user), Some(playlist)) if playlist.public || playlist.user == user.name => {
                    Verdict::matched(Effect::ALLOW)
                }
                _ => Verdict::matched(Effect::DENY),
            }
        },
    );

    // groups can modify their playlists.
    rules.add_rule(
        Some(Value::entity(Group::default())),
        Some("modify".into()),
        Some(Value::entity(Playlist::default())),
        |subject, _, resource| {
            match (subject.downcast_ref::<Group>(), resource.downcast_ref::<Playlist>()) {
                (Some(group), Some(playlist)) if playlist.group == group.name => {
                    Verdict::matched(Effect::ALLOW)
                }
                _ => Verdict::matched(Effect::DENY),
            }
        },
    );

    // superusers view any resource type.
    rules.add_rule(
        Some(Value::entity(User::default())),
        Some("view".into()),
        None,
        |subject, _, _| match subject.downcast_ref::<User>() {
            Some(user) if user.is_superuser => Verdict::decisive(Effect::ALLOW),
            _ => Verdict::matched(Effect::DENY),
        },
    );

    let jack = Value::entity(User {
        name: "jack".into(),
        is_superuser: false,
    });
    let overlord = Value::entity(User {
        name: "overlord".into(),
        is_superuser: true,
    });
    let editors = Value::entity(Group {
        name: "editors".into(),
    });
    let playlist = Value::entity(Playlist {
        public: false,
        user: "jack".into(),
        group: "editors".into(),
    });
    let archive = Value::entity(Archive);

    let queries = [
        (&jack, "view", &playlist),
        (&editors, "modify", &playlist),
        (&jack, "view", &archive),
        (&overlord, "view", &archive),
        (&overlord, "modify", &archive),
    ];

    for (subject, action, resource) in queries.iter() {
        let evaluation = rules.evaluate(subject, &(*action).into(), resource);
        let level = evaluation
            .level
            .map_or_else(|| "default".to_owned(), |level| level.to_string());
        println!(
            "{:?} {} {:?} => {} ({})",
            subject, action, resource, evaluation.effect, level
        );
    }
}
