//! HTTP request handlers

pub mod analysis;

pub use analysis::*;
