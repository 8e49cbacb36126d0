//! sparql-batch - run SPARQL query files against an endpoint.
//!
//! This library exposes the core modules for use in integration tests.

pub mod cli;
pub mod client;
pub mod config;
pub mod error;
pub mod html;
pub mod logging;
pub mod results;
pub mod runner;
