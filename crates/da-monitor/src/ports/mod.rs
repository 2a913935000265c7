//! # Ports Module
//!
//! Hexagonal architecture ports (outbound node dependency).

pub mod outbound;

pub use outbound::*;
