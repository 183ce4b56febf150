//! Maps free-text permission lists from bot exports to a [`Role`].
//!
//! Precedence: public > pure broadcaster > moderator > vip > subscriber > viewer.
//! Exports tag nearly every command with "Streamer", so a public synonym must
//! win and a "Streamer" tag alongside other roles must not restrict anything.

use commandcenter_common::models::Role;

const PUBLIC_SYNONYMS: [&str; 5] = ["anyone", "everyone", "all", "follower", "viewer"];
const BROADCASTER_SYNONYMS: [&str; 2] = ["streamer", "broadcaster"];

/// Splits a `,`/`;` separated list into trimmed, non-empty items.
pub fn split_list(s: &str) -> Vec<String> {
    s.split([',', ';'])
        .map(str::trim)
        .filter(|x| !x.is_empty())
        .map(String::from)
        .collect()
}

/// Which vocabularies matched somewhere in a permission list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PermissionSignals {
    pub public: bool,
    pub broadcaster: bool,
    pub moderator: bool,
    pub vip: bool,
    pub subscriber: bool,
}

impl PermissionSignals {
    pub fn scan(permissions: &str) -> Self {
        let items: Vec<String> = split_list(permissions)
            .into_iter()
            .map(|x| x.to_lowercase())
            .collect();
        let any = |pred: fn(&str) -> bool| items.iter().any(|x| pred(x));

        Self {
            public: any(|x| PUBLIC_SYNONYMS.iter().any(|s| x.contains(s))),
            broadcaster: any(|x| BROADCASTER_SYNONYMS.iter().any(|s| x.contains(s))),
            moderator: any(|x| x == "mod" || x.contains("moderator")),
            vip: any(|x| x.contains("vip")),
            subscriber: any(|x| x.contains("sub")),
        }
    }

    pub fn role(&self) -> Role {
        match *self {
            Self { public: true, .. } => Role::Viewer,
            Self {
                broadcaster: true,
                moderator: false,
                vip: false,
                subscriber: false,
                ..
            } => Role::Broadcaster,
            Self { moderator: true, .. } => Role::Moderator,
            Self { vip: true, .. } => Role::Vip,
            Self { subscriber: true, .. } => Role::Subscriber,
            _ => Role::Viewer,
        }
    }
}

pub fn classify_permissions(permissions: &str) -> Role {
    PermissionSignals::scan(permissions).role()
}

/// Role set stored on a chat command. Always exactly one role.
pub fn roles_from_permissions(permissions: &str) -> Vec<Role> {
    vec![classify_permissions(permissions)]
}
