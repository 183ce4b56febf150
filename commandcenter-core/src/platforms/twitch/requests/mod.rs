pub mod roles;
pub mod token;
