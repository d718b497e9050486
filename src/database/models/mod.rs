pub mod agent;
pub mod lead;
pub mod organization;
pub mod user;

pub use agent::{Agent, AgentProfile};
pub use lead::{Lead, LeadFields};
pub use organization::Organization;
pub use user::{NewUser, User};
