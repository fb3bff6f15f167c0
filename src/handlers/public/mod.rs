// handlers/public/mod.rs - Public handlers (no authentication required)
//
// Every input here comes from an anonymous caller and is validated before it
// reaches the Credential Manager or the store.

pub mod auth;
