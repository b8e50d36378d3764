// src/lib.rs

//! Content client for the university marketing site

pub mod config;
pub mod error;
pub mod models;
pub mod services;
pub mod utils;
