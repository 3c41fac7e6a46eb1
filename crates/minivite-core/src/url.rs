//! Mapping between served URLs and files under the project root.

use crate::error::ResolveError;
use percent_encoding::percent_decode_str;
use std::path::{Component, Path, PathBuf};

/// Convert an absolute file path into a root-relative URL.
///
/// `<root>/node_modules/vue/dist/vue.esm-browser.js` →
/// `/node_modules/vue/dist/vue.esm-browser.js`. Components are joined with
/// `/` whatever the platform separator is.
pub fn path_to_url(path: &Path, root: &Path) -> Result<String, ResolveError> {
    let relative = path
        .strip_prefix(root)
        .map_err(|_| ResolveError::OutsideRoot {
            path: path.to_path_buf(),
            root: root.to_path_buf(),
        })?;

    let mut url = String::new();
    for component in relative.components() {
        match component {
            Component::Normal(part) => {
                url.push('/');
                url.push_str(&part.to_string_lossy());
            }
            Component::CurDir => {}
            _ => {
                return Err(ResolveError::OutsideRoot {
                    path: path.to_path_buf(),
                    root: root.to_path_buf(),
                })
            }
        }
    }

    if url.is_empty() {
        url.push('/');
    }
    Ok(url)
}

/// Map a request path (`/src/main.js`) to a file under `root`.
///
/// Returns `None` for paths that are not absolute or that try to climb out
/// of the root with `..`. Percent-encoded segments are decoded first.
#[must_use]
pub fn url_to_path(url_path: &str, root: &Path) -> Option<PathBuf> {
    let url_path = url_path.split(&['?', '#'][..]).next().unwrap_or(url_path);
    let decoded = percent_decode_str(url_path).decode_utf8().ok()?;
    let stripped = decoded.strip_prefix('/')?;

    let mut file = root.to_path_buf();
    for segment in stripped.split('/') {
        match segment {
            "" | "." => {}
            ".." => return None,
            s if s.contains('\\') || s.contains('\0') => return None,
            s => file.push(s),
        }
    }
    Some(file)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_path_to_url() {
        let root = Path::new("/project");
        let path = root.join("node_modules/vue/dist/vue.esm-browser.js");
        assert_eq!(
            path_to_url(&path, root).unwrap(),
            "/node_modules/vue/dist/vue.esm-browser.js"
        );
    }

    #[test]
    fn test_path_to_url_root_itself() {
        let root = Path::new("/project");
        assert_eq!(path_to_url(root, root).unwrap(), "/");
    }

    #[test]
    fn test_path_to_url_outside_root() {
        let root = Path::new("/project");
        let err = path_to_url(Path::new("/elsewhere/pkg/index.js"), root).unwrap_err();
        assert!(matches!(err, ResolveError::OutsideRoot { .. }));
    }

    #[test]
    fn test_path_to_url_rejects_parent_components() {
        let root = Path::new("/project");
        let err = path_to_url(Path::new("/project/../etc/passwd"), root).unwrap_err();
        assert!(matches!(err, ResolveError::OutsideRoot { .. }));
    }

    #[test]
    fn test_url_to_path() {
        let root = Path::new("/project");
        assert_eq!(
            url_to_path("/src/main.js", root),
            Some(PathBuf::from("/project/src/main.js"))
        );
        assert_eq!(
            url_to_path("/src/main.js?t=123", root),
            Some(PathBuf::from("/project/src/main.js"))
        );
        assert_eq!(
            url_to_path("/my%20file.css", root),
            Some(PathBuf::from("/project/my file.css"))
        );
    }

    #[test]
    fn test_url_to_path_rejects_traversal() {
        let root = Path::new("/project");
        assert_eq!(url_to_path("/../secret", root), None);
        assert_eq!(url_to_path("/src/%2e%2e/%2e%2e/secret", root), None);
        assert_eq!(url_to_path("src/main.js", root), None);
    }
}
