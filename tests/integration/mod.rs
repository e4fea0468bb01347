//! Integration tests for the MySQL gateway.
//!
//! These tests require a running MySQL server.
//! Set DATABASE_URL environment variable to run them.

pub mod connection_test;
pub mod gateway_test;
