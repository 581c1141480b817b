//! Feedlens library exports for testing

pub mod core;
pub mod feed;

#[cfg(test)]
pub mod test_support;
