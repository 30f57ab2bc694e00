//! Domain model structs and DTOs.

pub mod dead_letter;
pub mod job;
