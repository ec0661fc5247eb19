pub mod app;
pub mod clock;
pub mod config;
pub mod db;
pub mod error;
pub mod password;
pub mod setup;
