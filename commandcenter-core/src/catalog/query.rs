use commandcenter_common::models::{ChatCommand, RewardEntry, Role};

/// Case-insensitive search over token, title, description, aliases and
/// category, optionally narrowed to commands that list `role`. Sorted by token.
pub fn search_commands<'a>(
    commands: &'a [ChatCommand],
    query: &str,
    role: Option<Role>,
) -> Vec<&'a ChatCommand> {
    let q = query.trim().to_lowercase();
    let mut hits: Vec<&ChatCommand> = commands
        .iter()
        .filter(|c| q.is_empty() || command_matches(c, &q))
        .filter(|c| role.is_none_or(|r| c.roles.contains(&r)))
        .collect();
    hits.sort_by(|a, b| a.command.cmp(&b.command));
    hits
}

fn command_matches(c: &ChatCommand, q: &str) -> bool {
    c.command.to_lowercase().contains(q)
        || c.title.to_lowercase().contains(q)
        || c.description.to_lowercase().contains(q)
        || c.aliases.iter().any(|a| a.to_lowercase().contains(q))
        || c.category.as_deref().unwrap_or("").to_lowercase().contains(q)
}

/// Matches against `"title description notes cost"`, so `"300"` finds a
/// 300-bit reward.
pub fn search_rewards<'a>(rewards: &'a [RewardEntry], query: &str) -> Vec<&'a RewardEntry> {
    let q = query.trim().to_lowercase();
    if q.is_empty() {
        return rewards.iter().collect();
    }
    rewards
        .iter()
        .filter(|r| {
            format!(
                "{} {} {} {}",
                r.title,
                r.description,
                r.notes.as_deref().unwrap_or(""),
                r.cost
            )
            .to_lowercase()
            .contains(&q)
        })
        .collect()
}
