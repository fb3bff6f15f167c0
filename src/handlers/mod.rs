// handlers/mod.rs - Two-tier handler layout
//
// Public (no auth) → Protected (bearer token required)
pub mod public;    // /auth/* token acquisition and signup
pub mod protected; // /documents/* per-user document management
