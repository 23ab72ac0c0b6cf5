//! Test modules for the export component
