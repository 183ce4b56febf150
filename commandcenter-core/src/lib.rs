// src/lib.rs

pub mod auth;
pub mod catalog;
pub mod clock;
pub mod config;
pub mod http;
pub mod platforms;
pub mod services;
pub mod test_utils;

pub use clock::{Clock, SystemClock};
pub use commandcenter_common::error::Error;
pub use http::{DefaultHttpClient, HttpClient};
