// src/lib.rs

//! tierdeck: operator avatar harvesting and tier board data generation.

pub mod error;
pub mod models;
pub mod pipeline;
pub mod services;
pub mod utils;
