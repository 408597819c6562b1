// handlers/mod.rs - Two-tier handler layout
//
// Public (no auth) handles health, token acquisition and every read route.
// Protected (bearer token) handles the routes that write to the record store.
pub mod public;
pub mod protected;
pub mod utils;
