// Fukurou offline resource cache library

pub mod cache;
pub mod config;
pub mod error;
pub mod fetch;
pub mod lifecycle;
pub mod logging;
pub mod router;
pub mod strategy;
