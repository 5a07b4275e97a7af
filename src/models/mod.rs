//! Serializable data exchanged with collaborators and the operator.

pub mod action;
pub mod config;
pub mod credential;
pub mod criteria;
pub mod policy;
pub mod variable;
