pub mod config;
pub mod logging;
pub mod pool;
pub mod runner;
