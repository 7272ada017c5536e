pub mod config;
pub mod consumer;
pub mod logging;
pub mod queue;
pub mod replay;
pub mod sink;
