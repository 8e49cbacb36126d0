//! Integration tests for sparql-batch.

pub mod batch_test;
pub mod binary_test;
pub mod common;
