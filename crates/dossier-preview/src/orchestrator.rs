use std::sync::Arc;

use serde::Serialize;
use tokio::sync::watch;

use crate::adapters::CellValue;
use crate::remote::ViewerProvider;
use crate::source::{ByteFetcher, DownloadUrlResolver, FileReference, ResolvedSource};
use crate::strategy::{strategies_for, PreviewContext};
use crate::{classify, FileCategory};

/// How the console should present a file.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum RenderMode {
    Image {
        src: String,
    },
    PagedDocument {
        page_count: u32,
        current_page: u32,
        can_previous: bool,
        can_next: bool,
        text: Option<String>,
    },
    Frame {
        src: String,
    },
    Markup {
        html: String,
    },
    Grid {
        rows: Vec<Vec<CellValue>>,
    },
    RemoteViewer {
        provider: ViewerProvider,
        embed_url: String,
        alternate: ViewerProvider,
        alternate_url: String,
    },
    Download {
        url: String,
        file_name: String,
    },
    Unavailable {
        reason: String,
    },
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PreviewState {
    pub loading: bool,
    pub error: Option<String>,
    pub mode: Option<RenderMode>,
}

pub struct PreviewOrchestrator {
    resolver: Arc<dyn DownloadUrlResolver>,
    fetcher: Arc<dyn ByteFetcher>,
}

impl PreviewOrchestrator {
    pub fn new(resolver: Arc<dyn DownloadUrlResolver>, fetcher: Arc<dyn ByteFetcher>) -> Self {
        Self { resolver, fetcher }
    }

    pub async fn preview(&self, file: &FileReference, page: Option<u32>) -> PreviewState {
        self.preview_with_progress(file, page, None).await
    }

    /// Resolve, classify and render `file`, publishing each intermediate
    /// state to `progress` when given. Never fails: the returned state always
    /// carries a mode.
    #[tracing::instrument(skip(self, file, progress), fields(file_name = ?file.file_name))]
    pub async fn preview_with_progress(
        &self,
        file: &FileReference,
        page: Option<u32>,
        progress: Option<&watch::Sender<PreviewState>>,
    ) -> PreviewState {
        let mut state = PreviewState {
            loading: true,
            ..Default::default()
        };
        publish(progress, &state);

        let mut resolved_url = None;
        if let Some(path) = file.storage_path.as_deref().filter(|p| !p.is_empty()) {
            match self.resolver.resolve(path).await {
                Ok(url) => resolved_url = Some(url),
                Err(e) => {
                    tracing::warn!(storage_path = %path, error = %e, "Download URL resolution failed");
                    state.error = Some(e.to_string());
                }
            }
        }

        let source = resolved_url
            .or_else(|| file.url.clone().filter(|u| !u.trim().is_empty()))
            .map(ResolvedSource::Url)
            .or_else(|| file.inline_payload.clone().map(ResolvedSource::Inline));

        let Some(source) = source else {
            state.loading = false;
            state.mode = Some(RenderMode::Unavailable {
                reason: "File content is unavailable".to_string(),
            });
            publish(progress, &state);
            return state;
        };

        let category = classify(file.content_type.as_deref(), file.file_name.as_deref());
        let ctx = PreviewContext {
            file,
            source,
            category,
            page,
            fetcher: self.fetcher.as_ref(),
        };

        for strategy in strategies_for(category) {
            state.loading = strategy.shows_loading();
            publish(progress, &state);

            match strategy.attempt(&ctx).await {
                Ok(mode) => {
                    tracing::debug!(strategy = strategy.name(), ?category, "Preview rendered");
                    state.loading = false;
                    state.mode = Some(mode);
                    publish(progress, &state);
                    return state;
                }
                Err(e) => {
                    tracing::debug!(strategy = strategy.name(), error = %e, "Preview strategy failed");
                    state.error = Some(e.to_string());
                }
            }
        }

        state.loading = false;
        state.mode = Some(unavailable_for(category));
        publish(progress, &state);
        state
    }
}

fn unavailable_for(category: FileCategory) -> RenderMode {
    RenderMode::Unavailable {
        reason: format!("No renderer available for {:?} files", category),
    }
}

fn publish(progress: Option<&watch::Sender<PreviewState>>, state: &PreviewState) {
    if let Some(tx) = progress {
        tx.send_replace(state.clone());
    }
}
