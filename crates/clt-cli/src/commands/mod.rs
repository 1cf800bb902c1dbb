//! Command handler modules for the clubtrack binary.

pub mod membership;
