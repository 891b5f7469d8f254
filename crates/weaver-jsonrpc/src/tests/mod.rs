//! Test suites for the JSON-RPC message layer.

mod support;
mod unit;
