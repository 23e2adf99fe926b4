use serde::{Deserialize, Serialize};

/// Metadata of a stored file, nested in a [`ResponseEnvelope`].
///
/// [`ResponseEnvelope`]: super::ResponseEnvelope
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileInfo {
    /// Cleaned base file name without any directory component.
    pub name: String,
    /// Media type inferred from the file extension, empty when unknown.
    pub mime_type: String,
}

impl FileInfo {
    /// Creates a new [`FileInfo`] from already cleaned parts.
    pub fn new(name: impl Into<String>, mime_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            mime_type: mime_type.into(),
        }
    }

    /// Derives file metadata from an untrusted file name.
    ///
    /// The name is reduced to its base component (see [`clean_file_name`]) and
    /// the media type is looked up from that component's extension.
    pub fn from_file_name(raw: &str) -> Self {
        let name = clean_file_name(raw);
        let mime_type = mime_guess::from_path(&name)
            .first_raw()
            .unwrap_or_default()
            .to_owned();

        Self { name, mime_type }
    }
}

/// Reduces an untrusted path to its final component.
///
/// Both `/` and `\` count as separators and trailing separators are ignored.
/// The special components `.` and `..` reduce to an empty name, so the result
/// can always be joined onto a directory without escaping it.
pub fn clean_file_name(raw: &str) -> String {
    let base = raw
        .rsplit(['/', '\\'])
        .find(|segment| !segment.is_empty())
        .unwrap_or_default();

    match base {
        "." | ".." => String::new(),
        base => base.to_owned(),
    }
}
