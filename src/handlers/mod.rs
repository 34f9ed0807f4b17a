// src/handlers/mod.rs

pub mod quiz;
pub mod review;
pub mod sessions;
pub mod stats;
