use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::{required_text, Record};
use crate::AppError;

/// A year folder under a client. The label doubles as the identifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Year {
    pub id: String,
    pub client_id: String,
    pub label: String,
    pub created_at: DateTime<Utc>,
}

impl Record for Year {
    const KIND: &'static str = "Year";

    fn id(&self) -> &str {
        &self.id
    }

    fn assign_id(&mut self, id: String) {
        self.id = id;
    }
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct YearInput {
    #[serde(default)]
    pub label: String,
}

impl Year {
    pub fn new(client_id: &str, input: YearInput, now: DateTime<Utc>) -> Result<Self, AppError> {
        let label = required_text("Year", &input.label)?;
        if label.contains('/') {
            return Err(AppError::InvalidInput(
                "Year must not contain '/'".to_string(),
            ));
        }
        Ok(Year {
            id: label.clone(),
            client_id: client_id.to_string(),
            label,
            created_at: now,
        })
    }
}
