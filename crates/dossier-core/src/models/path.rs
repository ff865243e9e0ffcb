use std::fmt;

use serde::{Deserialize, Serialize};

/// Location of a collection in the document store.
///
/// Every collection is scoped to the signed-in admin (`users/{owner}`) and,
/// for per-client data, to a client.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CollectionPath(String);

impl CollectionPath {
    pub fn clients(owner: &str) -> Self {
        Self(format!("users/{}/clients", owner))
    }

    pub fn years(owner: &str, client_id: &str) -> Self {
        Self(format!("users/{}/clients/{}/years", owner, client_id))
    }

    pub fn documents(owner: &str, client_id: &str) -> Self {
        Self(format!("users/{}/clients/{}/documents", owner, client_id))
    }

    pub fn generic_documents(owner: &str, client_id: &str) -> Self {
        Self(format!(
            "users/{}/clients/{}/generic_documents",
            owner, client_id
        ))
    }

    pub fn banners(owner: &str) -> Self {
        Self(format!("users/{}/banners", owner))
    }

    pub fn notifications(owner: &str) -> Self {
        Self(format!("users/{}/notifications", owner))
    }

    /// Path of a single record within this collection.
    pub fn record(&self, id: &str) -> String {
        format!("{}/{}", self.0, id)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CollectionPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
