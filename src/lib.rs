pub mod checker;
pub mod download;
pub mod error;
pub mod http;
pub mod platform;
pub mod registry;
pub mod resolve;
pub mod runtime;
