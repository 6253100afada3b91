// src/models.rs

pub mod asset;
pub mod catalog;
pub mod decommission;
pub mod maintenance;
