//! paramsift: hidden HTTP query parameter discovery.

pub mod cli;
pub mod core;
pub mod error;
pub mod http;
pub mod payload;
pub mod reporting;
pub mod scanner;
pub mod validation;
