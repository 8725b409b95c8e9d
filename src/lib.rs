pub mod auth;
pub mod config;
pub mod core;
pub mod journal;
pub mod models;
pub mod storage;
#[cfg(test)]
pub mod test_helpers;
pub mod trading;
