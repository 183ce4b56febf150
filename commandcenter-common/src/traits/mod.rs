pub mod role_traits;

pub use role_traits::RoleChecker;
