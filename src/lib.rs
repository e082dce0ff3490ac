pub mod api;
pub mod database;
pub mod services;
pub mod types;
#[cfg(test)]
pub mod test_utils;
