pub mod common;
pub mod config;
pub mod show;
pub mod sync;
