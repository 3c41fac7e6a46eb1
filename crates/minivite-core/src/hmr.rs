//! Live-reload client injected into served HTML.
//!
//! There is no module-level hot replacement: the client defines a single
//! global hook, `window.hotUpdate(path)`, which reloads the whole page.
//! No socket is wired up here; anything that can run script in the page can
//! trigger the hook, e.g. the snippet from [`update_script`].

/// Attribute marking the injected tag, used to keep injection idempotent.
pub const CLIENT_MARKER: &str = "data-minivite-hmr";

const CLIENT_SCRIPT: &str = r"
(function () {
  console.log('[hmr] full-reload client ready');
  window.hotUpdate = function (modulePath) {
    console.log('[hmr] update:', modulePath);
    location.reload();
  };
})();
";

/// The client-side reload listener, without the surrounding `<script>` tag.
#[must_use]
pub fn client_script() -> &'static str {
    CLIENT_SCRIPT
}

/// The `<script>` tag inserted into HTML responses.
#[must_use]
pub fn client_tag() -> String {
    format!("<script {CLIENT_MARKER}>{CLIENT_SCRIPT}</script>")
}

/// Insert the client tag before the first `</body>`, or append it when the
/// document has none. Documents that already carry the tag are returned
/// unchanged.
#[must_use]
pub fn inject_client(html: &str) -> String {
    if html.contains(CLIENT_MARKER) {
        return html.to_string();
    }

    let tag = client_tag();
    match html.find("</body>") {
        Some(pos) => {
            let mut out = String::with_capacity(html.len() + tag.len());
            out.push_str(&html[..pos]);
            out.push_str(&tag);
            out.push_str(&html[pos..]);
            out
        }
        None => format!("{html}{tag}"),
    }
}

/// Script that asks an open page to reload because `module_path` changed.
#[must_use]
pub fn update_script(module_path: &str) -> String {
    let path = serde_json::to_string(module_path).unwrap_or_else(|_| "\"\"".to_string());
    format!("if (window.hotUpdate) {{\n  window.hotUpdate({path});\n}}\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_defines_reload_hook() {
        let script = client_script();
        assert!(script.contains("window.hotUpdate"));
        assert!(script.contains("location.reload()"));
    }

    #[test]
    fn test_inject_before_body_close() {
        let html = "<html><body><div id=\"app\"></div></body></html>";
        let out = inject_client(html);
        let tag = client_tag();
        assert!(out.contains(&format!("{tag}</body>")));
        assert!(out.starts_with("<html><body><div id=\"app\"></div>"));
    }

    #[test]
    fn test_inject_appends_without_body() {
        let out = inject_client("<h1>hi</h1>");
        assert_eq!(out, format!("<h1>hi</h1>{}", client_tag()));
    }

    #[test]
    fn test_inject_is_idempotent() {
        let once = inject_client("<body></body>");
        let twice = inject_client(&once);
        assert_eq!(once, twice);
        assert_eq!(twice.matches(CLIENT_MARKER).count(), 1);
    }

    #[test]
    fn test_update_script_escapes_path() {
        let script = update_script("/src/a\"b.js");
        assert!(script.contains(r#"window.hotUpdate("/src/a\"b.js")"#));
    }
}
