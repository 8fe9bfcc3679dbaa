mod config;
pub mod status;
pub mod storageclass;

pub use config::*;
