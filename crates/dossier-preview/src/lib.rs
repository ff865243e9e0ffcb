//! Document preview for the admin console
//!
//! Given a file reference, the [`PreviewOrchestrator`] resolves a byte source,
//! classifies the file and walks an ordered list of render strategies until
//! one succeeds. Every failure degrades to a less capable presentation; the
//! orchestrator never returns an error.

pub mod adapters;
pub mod classifier;
pub mod error;
pub mod orchestrator;
pub mod paged;
pub mod remote;
pub mod source;
pub mod strategy;

pub use adapters::{docx_to_html, spreadsheet_to_grid, CellValue};
pub use classifier::{classify, FileCategory};
pub use error::PreviewError;
pub use orchestrator::{PreviewOrchestrator, PreviewState, RenderMode};
pub use paged::{PagedDocument, PagedState, RenderedPage};
pub use remote::{RemotePreview, ViewerProvider};
pub use source::{
    ByteFetcher, DownloadUrlResolver, FileReference, HttpFetcher, ResolvedSource,
    StorageUrlResolver,
};
