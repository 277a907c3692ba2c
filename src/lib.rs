pub mod client;
pub mod cmd;
pub mod config;
pub mod dirs;
pub mod display;
pub mod filelock;
pub mod logs;
pub mod nav;
pub mod session;
pub mod table;
pub mod types;
pub mod views;
