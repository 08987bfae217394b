//! Customer profile models

use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

lazy_static! {
    /// Security question keys stored on the profile, mapped to the prompt shown to the user
    static ref SECURITY_QUESTIONS: HashMap<&'static str, &'static str> = HashMap::from([
        ("maiden_name", "What is your mother's maiden name?"),
        ("birth_city", "In what city were you born?"),
        ("favorite_color", "What is your favorite color?"),
        ("first_pet", "What was the name of your first pet?"),
        ("first_school", "What was the name of your first school?"),
        ("childhood_friend", "What is the name of your childhood best friend?"),
        ("favorite_food", "What is your favorite food?"),
    ]);
}

const FALLBACK_QUESTION: &str = "Answer your security question";

/// Resolve a profile's security question key to its prompt text
pub fn security_question_prompt(key: Option<&str>) -> &'static str {
    key.and_then(|k| SECURITY_QUESTIONS.get(k.trim()).copied())
        .unwrap_or(FALLBACK_QUESTION)
}

/// Portal role, deciding which dashboard is rendered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", rename_all = "lowercase")]
pub enum Role {
    #[default]
    Customer,
    Staff,
    Admin,
}

impl From<String> for Role {
    fn from(value: String) -> Self {
        match value.to_lowercase().as_str() {
            "staff" | "teller" => Role::Staff,
            "admin" | "superuser" => Role::Admin,
            _ => Role::Customer,
        }
    }
}

impl Role {
    pub fn is_staff(&self) -> bool {
        matches!(self, Role::Staff | Role::Admin)
    }

    pub fn name(&self) -> &'static str {
        match self {
            Role::Customer => "customer",
            Role::Staff => "staff",
            Role::Admin => "admin",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NextOfKin {
    pub full_name: String,
    pub relationship: String,
    pub phone_number: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub email: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub role: Role,
    #[serde(default)]
    pub security_question: Option<String>,
    #[serde(default)]
    pub next_of_kin: Option<NextOfKin>,
}

impl Profile {
    pub fn full_name(&self) -> String {
        let name = format!("{} {}", self.first_name, self.last_name);
        let name = name.trim();
        if name.is_empty() {
            self.email.clone()
        } else {
            name.to_string()
        }
    }
}
