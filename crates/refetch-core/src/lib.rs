pub mod config;
pub mod logging;

// Core modules
pub mod control;
pub mod decode;
pub mod fetch;
pub mod retry;
pub mod target;
pub mod transport;
