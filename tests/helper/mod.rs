//! Shared fixtures for integration tests

#![allow(dead_code)]

mod datasets;

pub use datasets::*;
