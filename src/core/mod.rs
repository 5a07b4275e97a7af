//! Collaborator plumbing: configuration and inventory feeds.

pub mod inventory;
pub mod paths;
pub mod settings;
