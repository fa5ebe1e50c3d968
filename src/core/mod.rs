//! Configuration and webhook data model

pub mod config;
pub mod models;
