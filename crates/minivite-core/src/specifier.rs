//! Import specifier classification.
//!
//! Only bare specifiers (`vue`, `@scope/pkg`, `lodash/fp`) need resolution;
//! relative and absolute ones are fetched by the browser as written.

/// Kind of an import specifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathKind {
    /// `./x` or `../x`
    Relative,
    /// `/x`
    Absolute,
    /// Anything else: a package name, optionally followed by a subpath.
    Bare,
}

/// A specifier tagged with its kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassifiedPath {
    pub kind: PathKind,
    pub path: String,
}

impl ClassifiedPath {
    #[must_use]
    pub fn is_bare(&self) -> bool {
        self.kind == PathKind::Bare
    }
}

/// Classify a specifier. Total: every string gets exactly one kind.
#[must_use]
pub fn classify(spec: &str) -> ClassifiedPath {
    let kind = if spec.starts_with("./") || spec.starts_with("../") {
        PathKind::Relative
    } else if spec.starts_with('/') {
        PathKind::Absolute
    } else {
        PathKind::Bare
    };

    ClassifiedPath {
        kind,
        path: spec.to_string(),
    }
}

/// Split a bare specifier into package name and optional subpath.
///
/// `lodash/fp` → (`lodash`, `fp`), `@scope/pkg/sub` → (`@scope/pkg`, `sub`).
#[must_use]
pub fn split_bare(spec: &str) -> (&str, Option<&str>) {
    if spec.starts_with('@') {
        let mut slash_count = 0;
        for (i, c) in spec.char_indices() {
            if c == '/' {
                slash_count += 1;
                if slash_count == 2 {
                    return (&spec[..i], non_empty(&spec[i + 1..]));
                }
            }
        }
        return (spec, None);
    }

    match spec.find('/') {
        Some(pos) => (&spec[..pos], non_empty(&spec[pos + 1..])),
        None => (spec, None),
    }
}

fn non_empty(s: &str) -> Option<&str> {
    if s.is_empty() {
        None
    } else {
        Some(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_examples() {
        assert_eq!(classify("./x").kind, PathKind::Relative);
        assert_eq!(classify("../x").kind, PathKind::Relative);
        assert_eq!(classify("/x").kind, PathKind::Absolute);
        assert_eq!(classify("vue").kind, PathKind::Bare);
    }

    #[test]
    fn test_classify_edge_cases() {
        // A lone dot or dot-prefixed name is not relative.
        assert_eq!(classify(".").kind, PathKind::Bare);
        assert_eq!(classify(".hidden").kind, PathKind::Bare);
        assert_eq!(classify("").kind, PathKind::Bare);
        assert_eq!(classify("@scope/pkg").kind, PathKind::Bare);
        assert_eq!(classify("//cdn.example.com/x.js").kind, PathKind::Absolute);
    }

    #[test]
    fn test_classify_keeps_path() {
        let c = classify("@vue/shared");
        assert!(c.is_bare());
        assert_eq!(c.path, "@vue/shared");
    }

    #[test]
    fn test_split_bare() {
        assert_eq!(split_bare("lodash"), ("lodash", None));
        assert_eq!(split_bare("lodash/fp"), ("lodash", Some("fp")));
        assert_eq!(split_bare("@scope/pkg"), ("@scope/pkg", None));
        assert_eq!(split_bare("@scope/pkg/sub/x.js"), ("@scope/pkg", Some("sub/x.js")));
        assert_eq!(split_bare("pkg/"), ("pkg", None));
    }
}
