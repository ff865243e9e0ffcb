//! Paged document renderer
//!
//! Navigation is a small state machine over `[1, page_count]`. The pure
//! [`PagedState`] transitions are separate from the lopdf-backed
//! [`PagedDocument`] so they can be tested without a PDF.

use lopdf::Document;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PagedState {
    Unloaded,
    Loaded { page_count: u32, current_page: u32 },
    Error { message: String },
}

impl PagedState {
    pub fn loaded(page_count: u32) -> Self {
        if page_count == 0 {
            return PagedState::Error {
                message: "Document has no pages".to_string(),
            };
        }
        PagedState::Loaded {
            page_count,
            current_page: 1,
        }
    }

    pub fn next(&self) -> Self {
        match self {
            PagedState::Loaded {
                page_count,
                current_page,
            } => PagedState::Loaded {
                page_count: *page_count,
                current_page: (*current_page + 1).min(*page_count),
            },
            other => other.clone(),
        }
    }

    pub fn previous(&self) -> Self {
        match self {
            PagedState::Loaded {
                page_count,
                current_page,
            } => PagedState::Loaded {
                page_count: *page_count,
                current_page: current_page.saturating_sub(1).max(1),
            },
            other => other.clone(),
        }
    }

    pub fn go_to(&self, page: u32) -> Self {
        match self {
            PagedState::Loaded { page_count, .. } => PagedState::Loaded {
                page_count: *page_count,
                current_page: page.clamp(1, *page_count),
            },
            other => other.clone(),
        }
    }

    pub fn can_next(&self) -> bool {
        matches!(self, PagedState::Loaded { page_count, current_page } if current_page < page_count)
    }

    pub fn can_previous(&self) -> bool {
        matches!(self, PagedState::Loaded { current_page, .. } if *current_page > 1)
    }
}

/// One rendered page. `text` is `None` when lopdf cannot extract it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderedPage {
    pub number: u32,
    pub text: Option<String>,
}

pub struct PagedDocument {
    state: PagedState,
    document: Option<Document>,
}

impl Default for PagedDocument {
    fn default() -> Self {
        Self::new()
    }
}

impl PagedDocument {
    pub fn new() -> Self {
        Self {
            state: PagedState::Unloaded,
            document: None,
        }
    }

    /// Parse PDF bytes. Unparseable input or a document without pages moves
    /// the renderer to the error state.
    pub fn load(&mut self, bytes: &[u8]) -> &PagedState {
        match Document::load_mem(bytes) {
            Ok(document) => {
                let pages = document.get_pages().len() as u32;
                self.state = PagedState::loaded(pages);
                self.document = matches!(self.state, PagedState::Loaded { .. }).then_some(document);
            }
            Err(e) => {
                tracing::debug!(error = %e, "PDF failed to load");
                self.state = PagedState::Error {
                    message: format!("Failed to load PDF: {}", e),
                };
                self.document = None;
            }
        }
        &self.state
    }

    pub fn state(&self) -> &PagedState {
        &self.state
    }

    pub fn next(&mut self) {
        self.state = self.state.next();
    }

    pub fn previous(&mut self) {
        self.state = self.state.previous();
    }

    pub fn go_to(&mut self, page: u32) {
        self.state = self.state.go_to(page);
    }

    pub fn can_next(&self) -> bool {
        self.state.can_next()
    }

    pub fn can_previous(&self) -> bool {
        self.state.can_previous()
    }

    pub fn page_count(&self) -> Option<u32> {
        match self.state {
            PagedState::Loaded { page_count, .. } => Some(page_count),
            _ => None,
        }
    }

    pub fn current_page(&self) -> Option<u32> {
        match self.state {
            PagedState::Loaded { current_page, .. } => Some(current_page),
            _ => None,
        }
    }

    pub fn render_current(&self) -> Option<RenderedPage> {
        let number = self.current_page()?;
        let document = self.document.as_ref()?;
        let text = document
            .extract_text(&[number])
            .ok()
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty());
        Some(RenderedPage { number, text })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lopdf::{dictionary, Object, Stream};

    fn pdf_with_pages(count: usize) -> Vec<u8> {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        let kids: Vec<Object> = (0..count)
            .map(|_| {
                let content_id = doc.add_object(Stream::new(dictionary! {}, Vec::new()));
                doc.add_object(dictionary! {
                    "Type" => "Page",
                    "Parent" => pages_id,
                    "Contents" => content_id,
                })
                .into()
            })
            .collect();
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => count as i64,
                "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
            }),
        );
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);

        let mut buf = Vec::new();
        doc.save_to(&mut buf).unwrap();
        buf
    }

    #[test]
    fn test_previous_at_first_page_is_noop() {
        let state = PagedState::loaded(3);
        assert!(!state.can_previous());
        assert_eq!(state.previous(), state);
    }

    #[test]
    fn test_next_at_last_page_is_noop() {
        let state = PagedState::loaded(3).go_to(3);
        assert!(!state.can_next());
        assert_eq!(state.next(), state);
    }

    #[test]
    fn test_next_then_previous_returns_to_start() {
        let start = PagedState::loaded(5).go_to(2);
        assert_eq!(start.next().previous(), start);
    }

    #[test]
    fn test_go_to_clamps_into_range() {
        let state = PagedState::loaded(4);
        assert_eq!(
            state.go_to(0),
            PagedState::Loaded { page_count: 4, current_page: 1 }
        );
        assert_eq!(
            state.go_to(99),
            PagedState::Loaded { page_count: 4, current_page: 4 }
        );
    }

    #[test]
    fn test_zero_pages_is_error() {
        assert!(matches!(PagedState::loaded(0), PagedState::Error { .. }));
    }

    #[test]
    fn test_navigation_ignored_before_load() {
        assert_eq!(PagedState::Unloaded.next(), PagedState::Unloaded);
        assert!(!PagedState::Unloaded.can_next());
    }

    #[test]
    fn test_load_counts_pages() {
        let mut renderer = PagedDocument::new();
        renderer.load(&pdf_with_pages(3));
        assert_eq!(renderer.page_count(), Some(3));
        assert_eq!(renderer.current_page(), Some(1));
        assert!(renderer.can_next());
    }

    #[test]
    fn test_load_garbage_is_error() {
        let mut renderer = PagedDocument::new();
        let state = renderer.load(b"%PDF-nope");
        assert!(matches!(state, PagedState::Error { .. }));
        assert!(renderer.render_current().is_none());
    }
}
