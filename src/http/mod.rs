//! HTTP capability shared by the release fetcher and download executor.

mod client;

pub use client::{HttpClient, USER_AGENT};
