use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use super::{optional_text, required_text, Record};
use crate::AppError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Client {
    pub id: String,
    #[serde(default)]
    pub contact_key: Option<String>,
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub tax_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Record for Client {
    const KIND: &'static str = "Client";

    fn id(&self) -> &str {
        &self.id
    }

    fn assign_id(&mut self, id: String) {
        self.id = id;
    }
}

/// Client form submission, used for both create and edit.
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct ClientInput {
    #[serde(default)]
    pub contact_key: Option<String>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    #[validate(email(message = "Email address is not valid"))]
    pub email: Option<String>,
    #[serde(default)]
    pub tax_id: Option<String>,
}

impl ClientInput {
    /// Trim fields and check the required ones.
    pub fn normalized(self) -> Result<ClientInput, AppError> {
        let input = ClientInput {
            contact_key: optional_text(self.contact_key),
            name: required_text("Client name", &self.name)?,
            email: optional_text(self.email),
            tax_id: optional_text(self.tax_id),
        };
        input.validate()?;
        Ok(input)
    }
}

impl Client {
    pub fn from_input(input: ClientInput, now: DateTime<Utc>) -> Self {
        Client {
            id: String::new(),
            contact_key: input.contact_key,
            name: input.name,
            email: input.email,
            tax_id: input.tax_id,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn apply(&mut self, input: ClientInput, now: DateTime<Utc>) {
        self.contact_key = input.contact_key;
        self.name = input.name;
        self.email = input.email;
        self.tax_id = input.tax_id;
        self.updated_at = now;
    }
}
