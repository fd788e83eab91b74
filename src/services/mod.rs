pub mod clusters;
pub mod config;
pub mod gate;
pub mod mapper;
pub mod pipeline;
