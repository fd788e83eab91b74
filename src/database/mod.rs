pub mod corpus_repo;
pub mod models;
pub mod pool;
pub mod promotion_repo;
pub mod run_repo;
pub mod schema;
pub mod staged_repo;
