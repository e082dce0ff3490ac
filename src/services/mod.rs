pub mod auth;
pub mod matcher;
pub mod profiles;
