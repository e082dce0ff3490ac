pub mod mapping_repo;
pub mod models;
pub mod profile_repo;
pub mod user_repo;
