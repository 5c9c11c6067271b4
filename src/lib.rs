pub mod chat;
pub mod classifier;
pub mod config;
pub mod extract;
pub mod models;
pub mod patterns;
pub mod retrieval;
pub mod scoring;
pub mod server;

pub use config::AppConfig;
pub use server::run_server;
