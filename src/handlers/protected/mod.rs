// handlers/protected/mod.rs - Session-protected handlers
//
// Every handler here receives `Extension<Identity>` from the session
// middleware. Lead queries are built from `identity.policy`, never by hand.

pub mod agents; // /agents, /agents/create (organiser only)
pub mod leads; // /leads and its detail, create, update and delete pages
