// src/common.rs

pub mod cache;
pub mod error;
pub mod money;
