//! Shared key generation for storage backends.

/// Replace characters that are awkward in object keys and URLs.
///
/// Keeps ASCII letters, digits, `.`, `-` and `_`; everything else becomes `_`.
/// Leading dots are dropped so a name can never form `..` or a hidden file.
pub fn sanitize_file_name(file_name: &str) -> String {
    let base = file_name
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(file_name);
    let sanitized: String = base
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '.' || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();
    let sanitized = sanitized.trim_start_matches('.').replace("..", "_");
    if sanitized.is_empty() {
        "file".to_string()
    } else {
        sanitized
    }
}

/// Key for a client document. `collection` is `documents` or `generic_documents`.
pub fn document_key(
    owner: &str,
    client_id: &str,
    collection: &str,
    document_id: &str,
    file_name: &str,
) -> String {
    format!(
        "users/{}/clients/{}/{}/{}/{}",
        owner,
        client_id,
        collection,
        document_id,
        sanitize_file_name(file_name)
    )
}

pub fn banner_key(owner: &str, banner_id: &str, file_name: &str) -> String {
    format!(
        "users/{}/banners/{}/{}",
        owner,
        banner_id,
        sanitize_file_name(file_name)
    )
}

/// Best guess at a content type from the key's extension.
pub fn content_type_for_key(key: &str) -> &'static str {
    let ext = key
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "pdf" => "application/pdf",
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "svg" => "image/svg+xml",
        "doc" => "application/msword",
        "docx" => "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        "xls" => "application/vnd.ms-excel",
        "xlsx" => "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
        _ => "application/octet-stream",
    }
}
