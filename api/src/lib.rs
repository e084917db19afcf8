//! HTTP surface of the batch grader.
//!
//! Exposes the route tree and the shared JSON envelope so the binary and the
//! integration tests build the same application.

pub mod response;
pub mod routes;
