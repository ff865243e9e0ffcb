//! Document store for the dossier admin service
//!
//! Records are JSON documents keyed by id within a [`CollectionPath`]. The
//! store delivers live snapshots of a collection to subscribers; each
//! subscription is a handle released when dropped.
//!
//! [`CollectionPath`]: dossier_core::CollectionPath

pub mod memory;
pub mod mirror;
#[cfg(feature = "postgres")]
pub mod postgres;
pub mod repository;
pub mod store;
pub mod subscription;

pub use memory::MemoryDocumentStore;
pub use mirror::{BestEffortMirror, MirrorError, NoopRealtimeMirror, RealtimeMirror, RestRealtimeMirror};
#[cfg(feature = "postgres")]
pub use postgres::PgDocumentStore;
pub use repository::{CollectionRepository, TypedSubscription};
pub use store::{DocumentStore, StoreError, StoreResult};
pub use subscription::{Snapshot, Subscription, SubscriptionHub};
