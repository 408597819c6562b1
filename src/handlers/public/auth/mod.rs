// handlers/public/auth/mod.rs - Public authentication handlers
pub mod login; // POST /auth/login - authenticate and get a bearer token

pub use login::login_post;
