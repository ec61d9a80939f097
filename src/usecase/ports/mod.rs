pub mod render;
pub mod repo;
