// EstateHub - platform/mod.rs
//
// Platform abstraction layer: directories, config.toml, file writes and
// the backend REST client.
// Must NOT depend on: app.

pub mod api;
pub mod config;
pub mod fs;
