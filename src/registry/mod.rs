//! Release registry access: repository identity, decoded release
//! metadata, and the GitHub client.

mod client;
mod repo;
mod types;

#[cfg(test)]
pub use client::MockReleaseRegistry;
pub use client::{GitHubRegistry, ReleaseRegistry};
pub use repo::GitHubRepo;
pub use types::{Asset, ReleaseRecord};
