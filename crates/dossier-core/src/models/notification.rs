use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::{required_text, Record};
use crate::AppError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum NotificationAudience {
    All,
    Client { client_id: String },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Notification {
    pub id: String,
    pub title: String,
    pub message: String,
    pub audience: NotificationAudience,
    pub created_at: DateTime<Utc>,
}

impl Record for Notification {
    const KIND: &'static str = "Notification";

    fn id(&self) -> &str {
        &self.id
    }

    fn assign_id(&mut self, id: String) {
        self.id = id;
    }
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct NotificationInput {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub message: String,
    #[serde(default = "default_audience")]
    pub audience: NotificationAudience,
}

fn default_audience() -> NotificationAudience {
    NotificationAudience::All
}

impl Notification {
    pub fn from_input(input: NotificationInput, now: DateTime<Utc>) -> Result<Self, AppError> {
        let audience = match input.audience {
            NotificationAudience::Client { client_id } => NotificationAudience::Client {
                client_id: required_text("Client", &client_id)?,
            },
            NotificationAudience::All => NotificationAudience::All,
        };
        Ok(Notification {
            id: String::new(),
            title: required_text("Title", &input.title)?,
            message: required_text("Message", &input.message)?,
            audience,
            created_at: now,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_audience_serialization() {
        let json = serde_json::to_value(NotificationAudience::Client {
            client_id: "c1".into(),
        })
        .unwrap();
        assert_eq!(json, serde_json::json!({"kind": "client", "client_id": "c1"}));
    }

    #[test]
    fn test_missing_message_rejected() {
        let input: NotificationInput =
            serde_json::from_value(serde_json::json!({"title": "Hi"})).unwrap();
        assert_eq!(input.audience, NotificationAudience::All);
        assert!(Notification::from_input(input, Utc::now()).is_err());
    }
}
