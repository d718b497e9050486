// Form submissions and their validation.
//
// Every form arrives as `application/x-www-form-urlencoded` strings so that a
// bad value becomes a field error (422) rather than an extractor rejection.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

use crate::database::models::{AgentProfile, LeadFields, NewUser};
use crate::error::ApiError;

pub type FieldErrors = HashMap<String, String>;

/// Describes one input of a form page
#[derive(Debug, Clone, Serialize)]
pub struct FormField {
    pub name: &'static str,
    pub kind: &'static str,
    pub required: bool,
}

const fn field(name: &'static str, kind: &'static str, required: bool) -> FormField {
    FormField { name, kind, required }
}

pub const LEAD_FIELDS: &[FormField] = &[
    field("first_name", "text", true),
    field("last_name", "text", true),
    field("age", "number", true),
    field("email", "email", false),
    field("phone_number", "tel", false),
    field("description", "textarea", false),
    field("agent", "select", false),
];

pub const SIGNUP_FIELDS: &[FormField] = &[
    field("username", "text", true),
    field("email", "email", true),
    field("organization_name", "text", false),
    field("password1", "password", true),
    field("password2", "password", true),
];

pub const LOGIN_FIELDS: &[FormField] = &[
    field("username", "text", true),
    field("password", "password", true),
];

pub const AGENT_FIELDS: &[FormField] = &[
    field("username", "text", true),
    field("email", "email", true),
    field("first_name", "text", false),
    field("last_name", "text", false),
    field("password", "password", true),
];

fn required(errors: &mut FieldErrors, name: &str, value: &str) -> String {
    let value = value.trim();
    if value.is_empty() {
        errors.insert(name.to_string(), "This field is required.".to_string());
    }
    value.to_string()
}

fn check_email(errors: &mut FieldErrors, name: &str, value: &str) {
    let value = value.trim();
    if value.is_empty() {
        return;
    }
    let valid = value
        .split_once('@')
        .map(|(local, domain)| !local.is_empty() && domain.contains('.') && !domain.starts_with('.'))
        .unwrap_or(false);
    if !valid {
        errors.insert(name.to_string(), "Enter a valid email address.".to_string());
    }
}

fn finish<T>(errors: FieldErrors, message: &str, value: T) -> Result<T, ApiError> {
    if errors.is_empty() {
        Ok(value)
    } else {
        Err(ApiError::unprocessable_entity(message, errors))
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LeadForm {
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub age: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone_number: String,
    #[serde(default)]
    pub description: String,
    /// Agent id; empty or absent leaves the lead unassigned
    #[serde(default)]
    pub agent: Option<String>,
}

impl LeadForm {
    /// Validate against the agents of the submitting organization. An agent
    /// outside that list is rejected, which keeps assignments in-organization.
    pub fn validate(self, agents: &[AgentProfile]) -> Result<LeadFields, ApiError> {
        let mut errors = FieldErrors::new();

        let first_name = required(&mut errors, "first_name", &self.first_name);
        let last_name = required(&mut errors, "last_name", &self.last_name);

        let age = match self.age.trim() {
            "" => {
                errors.insert("age".to_string(), "This field is required.".to_string());
                0
            }
            raw => match raw.parse::<i32>() {
                Ok(age) if age >= 0 => age,
                _ => {
                    errors.insert("age".to_string(), "Enter a whole number of zero or more.".to_string());
                    0
                }
            },
        };

        check_email(&mut errors, "email", &self.email);

        let agent_id = match self.agent.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(raw) => match Uuid::parse_str(raw) {
                Ok(id) if agents.iter().any(|a| a.id == id) => Some(id),
                _ => {
                    errors.insert(
                        "agent".to_string(),
                        "Select a valid choice. That choice is not one of the available choices.".to_string(),
                    );
                    None
                }
            },
        };

        finish(
            errors,
            "Lead form is invalid",
            LeadFields {
                agent_id,
                first_name,
                last_name,
                age,
                email: self.email.trim().to_string(),
                phone_number: self.phone_number.trim().to_string(),
                description: self.description.trim().to_string(),
            },
        )
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SignupForm {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub organization_name: Option<String>,
    #[serde(default)]
    pub password1: String,
    #[serde(default)]
    pub password2: String,
}

/// A validated signup: the organization name plus the organiser's account.
/// `password` is still plain text; the handler hashes it.
#[derive(Debug, Clone)]
pub struct Signup {
    pub organization_name: String,
    pub username: String,
    pub email: String,
    pub password: String,
}

impl SignupForm {
    pub fn validate(self, min_password_length: usize) -> Result<Signup, ApiError> {
        let mut errors = FieldErrors::new();

        let username = required(&mut errors, "username", &self.username);
        if !username.is_empty()
            && !username
                .chars()
                .all(|c| c.is_alphanumeric() || matches!(c, '@' | '.' | '+' | '-' | '_'))
        {
            errors.insert(
                "username".to_string(),
                "Letters, digits and @/./+/-/_ only.".to_string(),
            );
        }

        let email = required(&mut errors, "email", &self.email);
        check_email(&mut errors, "email", &email);

        if self.password1.is_empty() {
            errors.insert("password1".to_string(), "This field is required.".to_string());
        } else if self.password1.chars().count() < min_password_length {
            errors.insert(
                "password1".to_string(),
                format!("This password is too short. It must contain at least {} characters.", min_password_length),
            );
        }
        if self.password1 != self.password2 {
            errors.insert("password2".to_string(), "The two password fields didn't match.".to_string());
        }

        let organization_name = self
            .organization_name
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty())
            .unwrap_or_else(|| username.clone());

        finish(
            errors,
            "Signup form is invalid",
            Signup {
                organization_name,
                username,
                email,
                password: self.password1,
            },
        )
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

impl LoginForm {
    pub fn validate(self) -> Result<(String, String), ApiError> {
        let mut errors = FieldErrors::new();
        let username = required(&mut errors, "username", &self.username);
        if self.password.is_empty() {
            errors.insert("password".to_string(), "This field is required.".to_string());
        }
        finish(errors, "Login form is invalid", (username, self.password))
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AgentForm {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub password: String,
}

impl AgentForm {
    /// Returns the account with `password_hash` holding the plain password
    /// until the handler hashes it.
    pub fn validate(self, min_password_length: usize) -> Result<NewUser, ApiError> {
        let mut errors = FieldErrors::new();

        let username = required(&mut errors, "username", &self.username);
        let email = required(&mut errors, "email", &self.email);
        check_email(&mut errors, "email", &email);
        if self.password.chars().count() < min_password_length {
            errors.insert(
                "password".to_string(),
                format!("This password is too short. It must contain at least {} characters.", min_password_length),
            );
        }

        finish(
            errors,
            "Agent form is invalid",
            NewUser {
                username,
                email,
                first_name: self.first_name.trim().to_string(),
                last_name: self.last_name.trim().to_string(),
                password_hash: self.password,
            },
        )
    }
}
