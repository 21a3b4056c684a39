pub mod config;
pub mod error;
pub mod practicum;
pub mod services;
pub mod telegram;
