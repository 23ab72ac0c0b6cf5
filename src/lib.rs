pub mod analyzer;
pub mod app;
pub mod core;
pub mod export;
pub mod gcp;
pub mod registry;
pub mod scanner;
