pub mod catalog;
pub mod role;
pub mod token;
pub mod viewer;

pub use catalog::{Catalog, ChatCommand, RewardEntry, RewardKind};
pub use role::Role;
pub use token::BroadcasterToken;
pub use viewer::{BadgeState, ViewerRoleSet, ViewerSession};
