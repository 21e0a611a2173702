//! Utility modules shared by the aggregate and the generators.

pub mod date;
pub mod xml;
