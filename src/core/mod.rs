// EstateHub - core/mod.rs
//
// Core business logic layer.
// Must NOT depend on: platform, app, or any I/O crate directly.

pub mod content;
pub mod dashboard;
pub mod export;
pub mod filter;
pub mod model;
pub mod responder;
pub mod seed;
