// EstateHub - app/mod.rs
//
// Application layer: catalog and session ownership, chat orchestration,
// and the composition root.
// Dependencies: core, platform, util.

pub mod chat;
pub mod session;
pub mod state;
pub mod store;
