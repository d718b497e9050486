// handlers/public/mod.rs - Public handlers (no session required)
//
// Landing, health and the account pages. Every input here is untrusted and
// validated by the form types in `crate::forms`.

pub mod landing; // GET / and GET /health
pub mod session; // GET|POST /login, POST /logout
pub mod signup; // GET|POST /signup

pub use landing::{health, landing};
pub use session::{login_get, login_post, logout_post};
pub use signup::{signup_get, signup_post};
