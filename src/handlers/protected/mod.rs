// handlers/protected/mod.rs - Protected handlers (bearer token required)
//
// Every handler here takes an `AuthUser` as its first extractor after state,
// so a missing or bad token is answered with 401 before the body is parsed,
// validated or written.
pub mod students;
