pub mod engine;
pub mod guard;
pub mod models;
pub mod normalizer;
pub mod store;
pub mod wheel;
