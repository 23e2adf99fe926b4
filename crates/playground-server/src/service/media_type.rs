//! Media type inspection for incoming upload requests.

use mime::Mime;

/// Extensions preferred over the registry order for common media types.
///
/// The registry lists several extensions for most types, in an order that is
/// not always the most recognizable one (`text/plain` starts with `conf`).
const PREFERRED_EXTENSIONS: &[(&str, &str)] = &[
    ("application/gzip", "gz"),
    ("application/javascript", "js"),
    ("application/json", "json"),
    ("application/octet-stream", "bin"),
    ("application/pdf", "pdf"),
    ("application/xml", "xml"),
    ("application/zip", "zip"),
    ("audio/mpeg", "mp3"),
    ("audio/wav", "wav"),
    ("image/gif", "gif"),
    ("image/jpeg", "jpg"),
    ("image/png", "png"),
    ("image/svg+xml", "svg"),
    ("image/tiff", "tiff"),
    ("image/webp", "webp"),
    ("text/css", "css"),
    ("text/csv", "csv"),
    ("text/html", "html"),
    ("text/markdown", "md"),
    ("text/plain", "txt"),
    ("video/mp4", "mp4"),
    ("video/webm", "webm"),
];

/// Returns `true` if the `Content-Type` value announces a multipart form.
///
/// Only the media type essence is compared, case-insensitively, so a missing
/// or broken `boundary` parameter still routes the request to the multipart
/// parser, which then rejects it.
pub fn is_multipart_form(content_type: &str) -> bool {
    content_type
        .split(';')
        .next()
        .is_some_and(|essence| essence.trim().eq_ignore_ascii_case("multipart/form-data"))
}

/// Returns the file extension (without the dot) for a `Content-Type` value.
///
/// Parameters such as `charset` are ignored. Returns `None` for values that
/// do not parse, for wildcards and for types without a registered extension.
pub fn extension_for(content_type: &str) -> Option<&'static str> {
    let mime: Mime = content_type.trim().parse().ok()?;
    if mime.type_() == mime::STAR || mime.subtype() == mime::STAR {
        return None;
    }

    let essence = mime.essence_str().to_ascii_lowercase();
    if let Some((_, extension)) = PREFERRED_EXTENSIONS
        .iter()
        .find(|(media_type, _)| *media_type == essence)
    {
        return Some(*extension);
    }

    let candidates = mime_guess::get_mime_extensions_str(&essence)?;

    let subtype = mime.subtype().as_str().to_ascii_lowercase();
    let suffix = mime.suffix().map(|suffix| suffix.as_str().to_ascii_lowercase());
    let hints = [
        Some(subtype.as_str()),
        suffix.as_deref(),
        subtype.strip_prefix("x-"),
    ];

    hints
        .into_iter()
        .flatten()
        .find_map(|hint| {
            candidates
                .iter()
                .copied()
                .find(|candidate| candidate.eq_ignore_ascii_case(hint))
        })
        .or_else(|| candidates.first().copied())
}
