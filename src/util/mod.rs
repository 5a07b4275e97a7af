//! Small helpers shared by the CLI output layer.

pub mod humanize;
