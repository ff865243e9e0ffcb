use serde::Serialize;

/// Third-party online viewers able to render office documents from a
/// public URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ViewerProvider {
    OfficeOnline,
    GoogleDocs,
}

impl ViewerProvider {
    pub fn embed_url(&self, source_url: &str) -> String {
        let encoded = urlencoding::encode(source_url);
        match self {
            ViewerProvider::OfficeOnline => {
                format!("https://view.officeapps.live.com/op/embed.aspx?src={}", encoded)
            }
            ViewerProvider::GoogleDocs => {
                format!("https://docs.google.com/gview?url={}&embedded=true", encoded)
            }
        }
    }

    pub fn other(&self) -> Self {
        match self {
            ViewerProvider::OfficeOnline => ViewerProvider::GoogleDocs,
            ViewerProvider::GoogleDocs => ViewerProvider::OfficeOnline,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemotePreview {
    source_url: String,
    selected: ViewerProvider,
}

impl RemotePreview {
    pub fn new(source_url: impl Into<String>) -> Self {
        Self {
            source_url: source_url.into(),
            selected: ViewerProvider::OfficeOnline,
        }
    }

    pub fn selected(&self) -> ViewerProvider {
        self.selected
    }

    pub fn toggle(&mut self) {
        self.selected = self.selected.other();
    }

    pub fn embed_url(&self) -> String {
        self.selected.embed_url(&self.source_url)
    }

    pub fn alternate(&self) -> ViewerProvider {
        self.selected.other()
    }

    pub fn alternate_url(&self) -> String {
        self.alternate().embed_url(&self.source_url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SOURCE: &str = "https://files.example.com/report.docx?expires=10&signature=a/b";

    #[test]
    fn test_office_online_is_default() {
        let preview = RemotePreview::new(SOURCE);
        assert_eq!(preview.selected(), ViewerProvider::OfficeOnline);
        assert_eq!(
            preview.embed_url(),
            "https://view.officeapps.live.com/op/embed.aspx?src=https%3A%2F%2Ffiles.example.com%2Freport.docx%3Fexpires%3D10%26signature%3Da%2Fb"
        );
    }

    #[test]
    fn test_toggle_switches_provider() {
        let mut preview = RemotePreview::new(SOURCE);
        preview.toggle();
        assert_eq!(preview.selected(), ViewerProvider::GoogleDocs);
        assert!(preview
            .embed_url()
            .starts_with("https://docs.google.com/gview?url=https%3A%2F%2F"));
        assert!(preview.embed_url().ends_with("&embedded=true"));
        preview.toggle();
        assert_eq!(preview.selected(), ViewerProvider::OfficeOnline);
    }
}
