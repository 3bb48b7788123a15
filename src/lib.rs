//! Declarative long-running-operation poller.
//!
//! A "wait for X" tool kind that polls an HTTP status endpoint with
//! exponential backoff until the operation completes, fails, times out,
//! or exhausts its retry budget. Tools are built from declarative
//! configuration against a named HTTP source and invoked with a JSON
//! argument object.

pub mod constants;
pub mod errors;
pub mod services;
pub mod sources;
pub mod tools;
pub mod utils;
