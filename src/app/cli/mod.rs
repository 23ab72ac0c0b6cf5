//! Command-line interface: argument parsing, config file merge and validation

pub mod args;
pub mod config;
pub mod validation;

pub use args::Args;
pub use validation::ValidationError;

#[cfg(test)]
mod tests;
