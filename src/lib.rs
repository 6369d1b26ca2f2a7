pub mod apis;
pub mod center;
pub mod config;
pub mod constants;
pub mod error;
pub mod logging;
pub mod minutes;
pub mod storage;
pub mod teams;
pub mod types;
pub mod workflows;
