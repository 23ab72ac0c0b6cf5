//! Test modules for CLI functionality

mod validation_tests;
