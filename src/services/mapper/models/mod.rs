pub mod acceptance;
pub mod types;
