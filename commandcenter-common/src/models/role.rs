use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::Error;

/// A Twitch chat role a command can require.
///
/// Variants carry no privilege ordering: a command lists the exact set of
/// roles that may use it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Viewer,
    #[serde(alias = "sub")]
    Subscriber,
    Vip,
    #[serde(alias = "mod")]
    Moderator,
    Broadcaster,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Viewer => "viewer",
            Role::Subscriber => "subscriber",
            Role::Vip => "vip",
            Role::Moderator => "moderator",
            Role::Broadcaster => "broadcaster",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "viewer" => Ok(Role::Viewer),
            "sub" | "subscriber" => Ok(Role::Subscriber),
            "vip" => Ok(Role::Vip),
            "mod" | "moderator" => Ok(Role::Moderator),
            "broadcaster" => Ok(Role::Broadcaster),
            other => Err(Error::Parse(format!("Unknown role '{}'", other))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_forms_deserialize() {
        let roles: Vec<Role> = serde_json::from_str(r#"["mod","sub","vip"]"#).unwrap();
        assert_eq!(roles, vec![Role::Moderator, Role::Subscriber, Role::Vip]);
    }

    #[test]
    fn serializes_long_names() {
        let s = serde_json::to_string(&[Role::Moderator, Role::Subscriber]).unwrap();
        assert_eq!(s, r#"["moderator","subscriber"]"#);
    }

    #[test]
    fn parse_rejects_unknown() {
        assert!("admin".parse::<Role>().is_err());
        assert_eq!(" MOD ".parse::<Role>().unwrap(), Role::Moderator);
    }
}
