//! Macros for declaring shapeable resource types

pub mod macros;
