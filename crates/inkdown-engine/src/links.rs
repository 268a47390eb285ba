//! Link-activation target resolution.
//!
//! The engine never navigates; it only decides what an activated link means
//! and hands the result to the host. Remote schemes go to the browser/OS
//! handler untouched, everything else is resolved against the hosting
//! document's directory.

use relative_path::RelativePath;
use std::path::{Path, PathBuf};

/// Where an activated link should be taken.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkTarget {
    /// `https://` or `data:` URL, left to an external handler.
    Remote(String),
    /// Filesystem path resolved relative to the hosting document.
    Local(PathBuf),
}

#[derive(Debug, thiserror::Error)]
pub enum LinkError {
    #[error("empty link target")]
    Empty,
}

/// Resolve a raw link target against the hosting document's directory.
pub fn resolve_link(target: &str, document_dir: &Path) -> Result<LinkTarget, LinkError> {
    let target = target.trim();
    if target.is_empty() {
        return Err(LinkError::Empty);
    }
    if target.starts_with("https://") || target.starts_with("data:") {
        return Ok(LinkTarget::Remote(target.to_string()));
    }
    let resolved = RelativePath::new(target).to_logical_path(document_dir);
    Ok(LinkTarget::Local(resolved))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn https_urls_are_remote() {
        let target = resolve_link("https://example.com/page", Path::new("/notes")).unwrap();
        assert_eq!(
            target,
            LinkTarget::Remote("https://example.com/page".to_string())
        );
    }

    #[test]
    fn data_urls_are_remote() {
        let target = resolve_link("data:image/png;base64,AAAA", Path::new("/notes")).unwrap();
        assert!(matches!(target, LinkTarget::Remote(_)));
    }

    #[test]
    fn relative_paths_resolve_against_document_dir() {
        let target = resolve_link("images/cat.png", Path::new("/notes/topic")).unwrap();
        assert_eq!(
            target,
            LinkTarget::Local(PathBuf::from("/notes/topic/images/cat.png"))
        );
    }

    #[test]
    fn parent_segments_are_normalized() {
        let target = resolve_link("../other.md", Path::new("/notes/topic")).unwrap();
        assert_eq!(target, LinkTarget::Local(PathBuf::from("/notes/other.md")));
    }

    #[test]
    fn empty_target_is_an_error() {
        assert!(resolve_link("  ", Path::new("/notes")).is_err());
    }

    #[test]
    fn plain_http_is_treated_as_a_path() {
        // Only https:// and data: are remote by contract.
        let target = resolve_link("http.md", Path::new("/notes")).unwrap();
        assert!(matches!(target, LinkTarget::Local(_)));
    }
}
