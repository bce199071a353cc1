pub mod cli;
pub mod config;
pub mod db;
pub mod finance;
pub mod format;
pub mod git;
pub mod mail;
pub mod models;
pub mod progress;
pub mod quotes;
pub mod report;
pub mod server;
pub mod share;
pub mod storage;
pub mod telemetry;
pub mod ui;
