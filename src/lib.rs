pub mod client;
pub mod common;
pub mod config;
pub mod logging;
pub mod router;
pub mod test_utils;
