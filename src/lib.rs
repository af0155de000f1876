pub mod args;
pub mod config;
pub mod display;
pub mod driver;
pub mod errors;
pub mod extract;
pub mod stats;
pub mod types;
