use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FileCategory {
    Image,
    Pdf,
    Word,
    Spreadsheet,
    Unsupported,
}

const IMAGE_EXTENSIONS: &[&str] = &[".png", ".jpg", ".jpeg", ".gif", ".webp", ".bmp", ".svg"];

/// Decide how a file should be previewed from its MIME type and name.
///
/// Rules are checked in order and the first match wins:
/// word (`.docx`/`.doc`), spreadsheet (`.xls`/`.xlsx` or a MIME type
/// containing "sheet"), pdf, image, then unsupported.
pub fn classify(content_type: Option<&str>, file_name: Option<&str>) -> FileCategory {
    let mime = content_type.unwrap_or_default().trim().to_lowercase();
    let name = file_name.unwrap_or_default().trim().to_lowercase();

    if name.ends_with(".docx") || name.ends_with(".doc") {
        return FileCategory::Word;
    }
    if name.ends_with(".xls") || name.ends_with(".xlsx") || mime.contains("sheet") {
        return FileCategory::Spreadsheet;
    }
    if mime.contains("pdf") || name.ends_with(".pdf") {
        return FileCategory::Pdf;
    }
    if mime.starts_with("image/") || IMAGE_EXTENSIONS.iter().any(|ext| name.ends_with(ext)) {
        return FileCategory::Image;
    }
    FileCategory::Unsupported
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spreadsheet_name_beats_pdf_mime() {
        assert_eq!(
            classify(Some("application/pdf"), Some("report.xlsx")),
            FileCategory::Spreadsheet
        );
    }

    #[test]
    fn test_word_beats_everything() {
        assert_eq!(
            classify(Some("application/vnd.ms-excel.sheet"), Some("notes.DOCX")),
            FileCategory::Word
        );
        assert_eq!(classify(None, Some("legacy.doc")), FileCategory::Word);
    }

    #[test]
    fn test_sheet_mime_without_name() {
        assert_eq!(
            classify(
                Some("application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"),
                None
            ),
            FileCategory::Spreadsheet
        );
    }

    #[test]
    fn test_pdf_beats_image() {
        assert_eq!(classify(Some("application/pdf"), Some("scan.png")), FileCategory::Pdf);
        assert_eq!(classify(None, Some("scan.pdf")), FileCategory::Pdf);
    }

    #[test]
    fn test_image_by_mime_or_extension() {
        assert_eq!(classify(Some("image/webp"), None), FileCategory::Image);
        assert_eq!(classify(None, Some("photo.JPEG")), FileCategory::Image);
    }

    #[test]
    fn test_everything_else_unsupported() {
        assert_eq!(classify(None, None), FileCategory::Unsupported);
        assert_eq!(
            classify(Some("application/zip"), Some("archive.zip")),
            FileCategory::Unsupported
        );
    }

    #[test]
    fn test_always_exactly_one_category() {
        let mimes = [None, Some("application/pdf"), Some("image/png"), Some("text/sheet")];
        let names = [None, Some("a.doc"), Some("a.xls"), Some("a.pdf"), Some("a.gif"), Some("a")];
        for mime in mimes {
            for name in names {
                let category = classify(mime, name);
                assert!(matches!(
                    category,
                    FileCategory::Image
                        | FileCategory::Pdf
                        | FileCategory::Word
                        | FileCategory::Spreadsheet
                        | FileCategory::Unsupported
                ));
            }
        }
    }
}
