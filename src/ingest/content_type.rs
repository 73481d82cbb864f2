use std::path::Path;

/// MIME type for a path, resolved from its extension.
///
/// Unknown or missing extensions resolve to an empty string; callers send and
/// record it as-is rather than substituting a guess.
#[must_use]
pub fn content_type_for(path: &Path) -> String {
    path.extension()
        .and_then(|ext| ext.to_str())
        .and_then(|ext| mime_guess::from_ext(ext).first())
        .map(|mime| mime.essence_str().to_string())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_extensions_resolve() {
        assert_eq!(content_type_for(Path::new("a/report.pdf")), "application/pdf");
        assert_eq!(content_type_for(Path::new("photo.PNG")), "image/png");
        assert_eq!(content_type_for(Path::new("notes.txt")), "text/plain");
    }

    #[test]
    fn unknown_extension_is_empty() {
        assert_eq!(content_type_for(Path::new("data.zzqx")), "");
    }

    #[test]
    fn missing_extension_is_empty() {
        assert_eq!(content_type_for(Path::new("README")), "");
    }
}
