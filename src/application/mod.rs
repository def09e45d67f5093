//! Application services: the session-scoped state machines built on the HTTP ports.

pub mod catalog;
pub mod comments;
pub mod error;
pub mod filters;
pub mod pagination;
pub mod ports;
pub mod search;
