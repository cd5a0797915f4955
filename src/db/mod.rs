pub mod connection;
pub mod job_repository;
#[cfg(test)]
pub mod memory;
pub mod migrations;
pub mod models;
pub mod store;
pub mod user_repository;

pub use job_repository::JobRepository;
pub use store::{JobStore, UserDirectory};
pub use user_repository::UserRepository;
