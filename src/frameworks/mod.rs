// Frameworks: configuration, database bootstrap and the server runtime.

pub mod config;
pub mod db;
pub mod server;
