pub mod adapter;
pub mod config;
pub mod error;
pub mod types;
