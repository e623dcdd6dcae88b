pub mod config;
pub mod feed;
pub mod monitor;
pub mod report;
pub mod storage;
