//! Command implementations

pub mod edit;
