// src/engine/mod.rs

pub mod selection;
pub mod session;
pub mod stats;
