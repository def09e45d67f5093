//! Client core for a REST blog backend.

pub mod application;
pub mod cache;
pub mod config;
pub mod domain;
pub mod infra;
