use serde::{Deserialize, Serialize};

use crate::models::role::Role;
use crate::models::viewer::ViewerRoleSet;

/// A chat command entry (e.g. `!so`) as published in the commands snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatCommand {
    /// Always starts with `!`. Unique within a catalog, case-insensitively.
    pub command: String,
    pub title: String,
    pub description: String,
    /// Never empty.
    pub roles: Vec<Role>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub aliases: Vec<String>,
    #[serde(default)]
    pub cooldown_sec: u32,
}

/// Which currency a reward is redeemed with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RewardKind {
    Bits,
    ChannelPoints,
}

/// A bits or channel-points reward. Not role gated.
#[derive(Debug, Clone, PartialEq)]
pub struct RewardEntry {
    /// Unique key within its collection.
    pub title: String,
    pub description: String,
    pub cost: u64,
    pub notes: Option<String>,
    pub category: Option<String>,
}

/// The three collections produced by one catalog build.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Catalog {
    pub commands: Vec<ChatCommand>,
    pub bits: Vec<RewardEntry>,
    pub points: Vec<RewardEntry>,
}

impl Catalog {
    pub fn rewards(&self, kind: RewardKind) -> &[RewardEntry] {
        match kind {
            RewardKind::Bits => &self.bits,
            RewardKind::ChannelPoints => &self.points,
        }
    }
}

impl ChatCommand {
    /// True when the viewer holds every required role.
    pub fn is_unlocked_for(&self, roles: &ViewerRoleSet) -> bool {
        self.roles.iter().all(|r| roles.grants(*r))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn command(roles: Vec<Role>) -> ChatCommand {
        ChatCommand {
            command: "!so".into(),
            title: "So".into(),
            description: String::new(),
            roles,
            category: None,
            aliases: Vec::new(),
            cooldown_sec: 0,
        }
    }

    #[test]
    fn unlocked_only_when_every_required_role_is_held() {
        let vip = ViewerRoleSet { is_vip: true, resolved: true, ..Default::default() };
        assert!(!command(vec![Role::Moderator, Role::Vip]).is_unlocked_for(&vip));
        assert!(!command(vec![Role::Moderator]).is_unlocked_for(&vip));
        assert!(command(vec![Role::Vip]).is_unlocked_for(&vip));

        let mod_vip = ViewerRoleSet { is_moderator: true, ..vip };
        assert!(command(vec![Role::Moderator, Role::Vip]).is_unlocked_for(&mod_vip));
        assert!(command(vec![Role::Viewer]).is_unlocked_for(&ViewerRoleSet::unresolved()));
    }

    #[test]
    fn optional_fields_are_omitted_when_empty() {
        let v = serde_json::to_value(command(vec![Role::Viewer])).unwrap();
        assert!(v.get("category").is_none());
        assert!(v.get("aliases").is_none());
        assert_eq!(v["cooldownSec"], 0);
    }

    #[test]
    fn rewards_by_kind() {
        let catalog = Catalog {
            bits: vec![RewardEntry {
                title: "Hydrate".into(),
                description: String::new(),
                cost: 100,
                notes: None,
                category: None,
            }],
            ..Default::default()
        };
        assert_eq!(catalog.rewards(RewardKind::Bits).len(), 1);
        assert!(catalog.rewards(RewardKind::ChannelPoints).is_empty());
    }
}
