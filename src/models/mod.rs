//! Domain model module declarations.

pub mod counter;
pub mod worker;
