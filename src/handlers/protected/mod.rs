// handlers/protected/mod.rs - Protected handlers (bearer token required)
//
// Routes in this tier sit behind `jwt_auth_middleware`, which injects an
// `AuthUser` extension. Handlers take `Extension<AuthUser>` and never look at
// the Authorization header themselves.

pub mod documents;
