// handlers/mod.rs - two-tier handler layout
//
// Public (no session) → Protected (session cookie or Bearer token)
//
// Protected routes sit behind `session_middleware`, which injects an
// `Identity`; role gates run inside each handler against the access mode.
pub mod public; // Tier 1: landing, health, signup, login, logout
pub mod protected; // Tier 2: leads and agents
