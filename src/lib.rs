pub mod config;
pub mod errors;
pub mod heal;
pub mod logger;
pub mod report;
pub mod utils;
pub mod version;
