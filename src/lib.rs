pub mod classify;
pub mod cli;
pub mod config;
pub mod file_scan;
pub mod scan;
