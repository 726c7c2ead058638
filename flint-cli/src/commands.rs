pub mod accounts;
pub mod config;
pub mod init;
pub mod migrate;
pub mod prompt;
pub mod resolve;
