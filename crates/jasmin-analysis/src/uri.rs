//! `file:` URI ↔ filesystem path conversions.

use std::path::{Path, PathBuf};
use url::Url;

/// Convert a `file:` URI into a filesystem path.
pub fn uri_to_path(uri: &str) -> Option<PathBuf> {
    Url::parse(uri).ok()?.to_file_path().ok()
}

/// Convert a filesystem path into a `file:` URI string.
pub fn path_to_uri(path: &Path) -> Option<String> {
    Url::from_file_path(path).ok().map(|u| u.to_string())
}

/// Directory containing the file a URI points at.
pub fn uri_dir(uri: &str) -> Option<PathBuf> {
    uri_to_path(uri).and_then(|p| p.parent().map(Path::to_path_buf))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip() {
        let path = Path::new("/tmp/project/src/main.jazz");
        let uri = path_to_uri(path).unwrap();
        assert_eq!(uri, "file:///tmp/project/src/main.jazz");
        assert_eq!(uri_to_path(&uri).unwrap(), path);
        assert_eq!(uri_dir(&uri).unwrap(), Path::new("/tmp/project/src"));
    }

    #[test]
    fn test_non_file_scheme_is_rejected() {
        assert!(uri_to_path("https://example.com/x.jazz").is_none());
    }
}
