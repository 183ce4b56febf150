// File: commandcenter-core/src/test_utils/mod.rs
//
// Fakes shared by unit tests, integration tests and the server crate's tests.

pub mod helpers;

pub use helpers::{ManualClock, RecordedRequest, ScriptedHttpClient};
