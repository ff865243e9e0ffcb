//! Render strategies
//!
//! Each file category maps to an ordered chain of strategies. The
//! orchestrator tries them in turn and stops at the first success.

use async_trait::async_trait;

use crate::adapters::{docx_to_html, spreadsheet_to_grid};
use crate::orchestrator::RenderMode;
use crate::paged::{PagedDocument, PagedState};
use crate::remote::RemotePreview;
use crate::source::{ByteFetcher, FileReference, ResolvedSource};
use crate::{FileCategory, PreviewError};

/// Everything a strategy may look at for one preview request.
pub struct PreviewContext<'a> {
    pub file: &'a FileReference,
    pub source: ResolvedSource,
    pub category: FileCategory,
    pub page: Option<u32>,
    pub fetcher: &'a dyn ByteFetcher,
}

impl PreviewContext<'_> {
    async fn bytes(&self) -> Result<Vec<u8>, PreviewError> {
        match &self.source {
            ResolvedSource::Url(url) => self.fetcher.fetch(url).await,
            ResolvedSource::Inline(payload) => payload
                .decode()
                .map_err(|e| PreviewError::Fetch(e.to_string())),
        }
    }

    fn content_type(&self) -> Option<&str> {
        self.file.content_type.as_deref()
    }

    fn file_name(&self) -> String {
        self.file
            .file_name
            .clone()
            .unwrap_or_else(|| "download".to_string())
    }
}

#[async_trait]
pub trait PreviewStrategy: Send + Sync {
    fn name(&self) -> &'static str;

    /// Whether the loading flag is raised while this strategy runs.
    fn shows_loading(&self) -> bool {
        false
    }

    async fn attempt(&self, ctx: &PreviewContext<'_>) -> Result<RenderMode, PreviewError>;
}

/// Fetch the bytes and run the word or spreadsheet adapter.
pub struct InlineConversion;

#[async_trait]
impl PreviewStrategy for InlineConversion {
    fn name(&self) -> &'static str {
        "inline_conversion"
    }

    fn shows_loading(&self) -> bool {
        true
    }

    async fn attempt(&self, ctx: &PreviewContext<'_>) -> Result<RenderMode, PreviewError> {
        let bytes = ctx.bytes().await?;
        match ctx.category {
            FileCategory::Word => docx_to_html(&bytes).map(|html| RenderMode::Markup { html }),
            FileCategory::Spreadsheet => {
                spreadsheet_to_grid(&bytes).map(|rows| RenderMode::Grid { rows })
            }
            other => Err(PreviewError::Unsupported(format!(
                "No inline converter for {:?}",
                other
            ))),
        }
    }
}

pub struct RemoteViewerStrategy;

#[async_trait]
impl PreviewStrategy for RemoteViewerStrategy {
    fn name(&self) -> &'static str {
        "remote_viewer"
    }

    async fn attempt(&self, ctx: &PreviewContext<'_>) -> Result<RenderMode, PreviewError> {
        let url = ctx.source.url().ok_or_else(|| {
            PreviewError::Unsupported("Inline-only files cannot use an online viewer".to_string())
        })?;
        let preview = RemotePreview::new(url);
        Ok(RenderMode::RemoteViewer {
            provider: preview.selected(),
            embed_url: preview.embed_url(),
            alternate: preview.alternate(),
            alternate_url: preview.alternate_url(),
        })
    }
}

pub struct PagedRender;

#[async_trait]
impl PreviewStrategy for PagedRender {
    fn name(&self) -> &'static str {
        "paged_render"
    }

    async fn attempt(&self, ctx: &PreviewContext<'_>) -> Result<RenderMode, PreviewError> {
        let bytes = ctx.bytes().await?;
        let mut document = PagedDocument::new();
        if let PagedState::Error { message } = document.load(&bytes) {
            return Err(PreviewError::Load(message.clone()));
        }
        if let Some(page) = ctx.page {
            document.go_to(page);
        }
        let rendered = document
            .render_current()
            .ok_or_else(|| PreviewError::Load("No page to render".to_string()))?;
        Ok(RenderMode::PagedDocument {
            page_count: document.page_count().unwrap_or(0),
            current_page: rendered.number,
            can_previous: document.can_previous(),
            can_next: document.can_next(),
            text: rendered.text,
        })
    }
}

pub struct FrameEmbed;

#[async_trait]
impl PreviewStrategy for FrameEmbed {
    fn name(&self) -> &'static str {
        "frame_embed"
    }

    async fn attempt(&self, ctx: &PreviewContext<'_>) -> Result<RenderMode, PreviewError> {
        Ok(RenderMode::Frame {
            src: ctx.source.embeddable(ctx.content_type()),
        })
    }
}

pub struct DirectImage;

#[async_trait]
impl PreviewStrategy for DirectImage {
    fn name(&self) -> &'static str {
        "direct_image"
    }

    async fn attempt(&self, ctx: &PreviewContext<'_>) -> Result<RenderMode, PreviewError> {
        Ok(RenderMode::Image {
            src: ctx.source.embeddable(ctx.content_type()),
        })
    }
}

pub struct DownloadLink;

#[async_trait]
impl PreviewStrategy for DownloadLink {
    fn name(&self) -> &'static str {
        "download_link"
    }

    async fn attempt(&self, ctx: &PreviewContext<'_>) -> Result<RenderMode, PreviewError> {
        Ok(RenderMode::Download {
            url: ctx.source.embeddable(ctx.content_type()),
            file_name: ctx.file_name(),
        })
    }
}

/// Ordered strategy chain for a category. Always ends with a download link.
pub fn strategies_for(category: FileCategory) -> Vec<Box<dyn PreviewStrategy>> {
    match category {
        FileCategory::Word | FileCategory::Spreadsheet => vec![
            Box::new(InlineConversion),
            Box::new(RemoteViewerStrategy),
            Box::new(DownloadLink),
        ],
        FileCategory::Pdf => vec![
            Box::new(PagedRender),
            Box::new(FrameEmbed),
            Box::new(DownloadLink),
        ],
        FileCategory::Image => vec![Box::new(DirectImage), Box::new(DownloadLink)],
        FileCategory::Unsupported => vec![Box::new(DownloadLink)],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(category: FileCategory) -> Vec<&'static str> {
        strategies_for(category).iter().map(|s| s.name()).collect()
    }

    #[test]
    fn test_chains_are_ordered() {
        assert_eq!(
            names(FileCategory::Word),
            vec!["inline_conversion", "remote_viewer", "download_link"]
        );
        assert_eq!(
            names(FileCategory::Pdf),
            vec!["paged_render", "frame_embed", "download_link"]
        );
        assert_eq!(names(FileCategory::Image), vec!["direct_image", "download_link"]);
        assert_eq!(names(FileCategory::Unsupported), vec!["download_link"]);
    }

    #[test]
    fn test_only_conversion_shows_loading() {
        for category in [FileCategory::Word, FileCategory::Pdf, FileCategory::Image] {
            for strategy in strategies_for(category) {
                assert_eq!(strategy.shows_loading(), strategy.name() == "inline_conversion");
            }
        }
    }
}
