// handlers/public/auth/mod.rs - Public authentication handlers

pub mod login;  // POST /auth/token, POST /auth/login - exchange credentials for a bearer token
pub mod signup; // POST /auth/signup - create an identity
pub mod utils;

pub use login::{login_post, token_post, TokenResponse};
pub use signup::{signup_post, SignupRequest, UserResponse};
