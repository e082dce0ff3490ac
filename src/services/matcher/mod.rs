pub mod engine;
pub mod learning;
pub mod normalizer;
pub mod session;
