#![deny(clippy::all, clippy::pedantic)]

pub mod articles;
pub mod auth;
pub mod categories;
pub mod comments;
pub mod tags;
