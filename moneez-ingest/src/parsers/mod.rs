//! Bank-specific field tables

pub mod gls;
