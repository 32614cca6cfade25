//! HTTP route handlers, one module per resource.

pub mod admin;
pub mod auth;
pub mod blog;
pub mod collections;
pub mod favicon;
pub mod tags;
pub mod websites;
