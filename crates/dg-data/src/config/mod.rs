//! Grid configuration module

pub mod grid_config;

pub use grid_config::*;
