#[cfg(test)]
mod test_utils;

pub mod client;
pub mod config;
pub mod relay;
pub mod transcript;
