use serde::{Deserialize, Serialize};

use crate::models::role::Role;

/// Identity handed to us by the OAuth session layer for one page view.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewerSession {
    pub twitch_user_id: Option<String>,
    /// The viewer's own user access token (needed for the subscription lookup).
    pub access_token: Option<String>,
}

impl ViewerSession {
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn is_logged_in(&self) -> bool {
        self.twitch_user_id.as_deref().is_some_and(|id| !id.is_empty())
    }
}

/// Per-request role membership. Never persisted.
///
/// `resolved == false` means "not checked yet" (e.g. logged out), which is
/// different from "checked and absent".
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewerRoleSet {
    pub is_moderator: bool,
    pub is_vip: bool,
    pub is_subscriber: bool,
    pub resolved: bool,
}

/// Display state of a single role badge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BadgeState {
    Checking,
    Active,
    Inactive,
}

impl ViewerRoleSet {
    pub fn unresolved() -> Self {
        Self::default()
    }

    pub fn grants(&self, role: Role) -> bool {
        match role {
            Role::Viewer => true,
            Role::Subscriber => self.is_subscriber,
            Role::Vip => self.is_vip,
            Role::Moderator => self.is_moderator,
            // No separate broadcaster check exists; moderators see broadcaster commands.
            Role::Broadcaster => self.is_moderator,
        }
    }

    pub fn badge(&self, role: Role) -> BadgeState {
        if !self.resolved {
            BadgeState::Checking
        } else if self.grants(role) {
            BadgeState::Active
        } else {
            BadgeState::Inactive
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn viewer_role_is_always_granted() {
        let roles = ViewerRoleSet::unresolved();
        assert!(roles.grants(Role::Viewer));
        assert!(!roles.grants(Role::Moderator));
    }

    #[test]
    fn broadcaster_follows_moderator() {
        let roles = ViewerRoleSet { is_moderator: true, resolved: true, ..Default::default() };
        assert!(roles.grants(Role::Broadcaster));
        assert!(!roles.grants(Role::Vip));
    }

    #[test]
    fn badge_distinguishes_unchecked_from_absent() {
        let unchecked = ViewerRoleSet::unresolved();
        let checked = ViewerRoleSet { resolved: true, ..Default::default() };
        assert_eq!(unchecked.badge(Role::Vip), BadgeState::Checking);
        assert_eq!(checked.badge(Role::Vip), BadgeState::Inactive);
    }

    #[test]
    fn serializes_camel_case() {
        let roles = ViewerRoleSet { is_vip: true, resolved: true, ..Default::default() };
        let v = serde_json::to_value(roles).unwrap();
        assert_eq!(v["isVip"], true);
        assert_eq!(v["isModerator"], false);
        assert_eq!(v["resolved"], true);
    }
}
