//! End-to-end tests of the standard transform chain over a temp project.

use minivite_core::hmr::CLIENT_MARKER;
use minivite_core::mime;
use minivite_core::{Body, ChainSettings, RequestContext, TransformChain};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn write(root: &Path, rel: &str, content: impl AsRef<[u8]>) {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

/// A small Vue app with one installed package.
fn vue_app() -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();

    write(root, "node_modules/vue/package.json", r#"{"name":"vue","module":"dist/vue.esm-browser.js","main":"index.js"}"#);
    write(root, "node_modules/vue/dist/vue.esm-browser.js", "export function createApp() {}\n");
    write(
        root,
        "index.html",
        "<!doctype html>\n<html><body><div id=\"app\"></div><script type=\"module\" src=\"/src/main.js\"></script></body></html>\n",
    );
    write(
        root,
        "src/main.js",
        "import { createApp } from 'vue'\nimport App from './App.vue'\n\ncreateApp(App).mount('#app')\n",
    );
    write(
        root,
        "src/App.vue",
        "<template>\n  <h1>{{ title }}</h1>\n</template>\n\n<script>\nexport default {\n  data() { return { title: 'minivite' } }\n}\n</script>\n\n<style>\nh1 { color: teal; }\n</style>\n",
    );
    write(root, "public/data.json", r#"{"ok":true}"#);
    dir
}

fn chain(root: &Path) -> TransformChain {
    TransformChain::standard(&ChainSettings::new(root.to_path_buf()))
}

fn text(ctx: &RequestContext) -> String {
    String::from_utf8(ctx.body.clone().expect("body").into_bytes()).unwrap()
}

#[tokio::test]
async fn script_bare_imports_are_rewritten() {
    let app = vue_app();
    let ctx = chain(app.path()).run("/src/main.js").await;

    assert_eq!(ctx.status, 200);
    assert_eq!(ctx.content_type.as_deref(), Some(mime::JAVASCRIPT));
    let body = text(&ctx);
    assert!(body.contains(r#"import { createApp } from "/node_modules/vue/dist/vue.esm-browser.js""#));
    assert!(body.contains("import App from './App.vue'"));
    assert!(!body.contains("'vue'"));
}

#[tokio::test]
async fn rewritten_url_is_servable() {
    let app = vue_app();
    let chain = chain(app.path());

    let ctx = chain.run("/node_modules/vue/dist/vue.esm-browser.js").await;
    assert_eq!(ctx.status, 200);
    assert_eq!(text(&ctx), "export function createApp() {}\n");
}

#[tokio::test]
async fn html_gets_reload_client_once() {
    let app = vue_app();
    let chain = chain(app.path());

    for path in ["/index.html", "/"] {
        let ctx = chain.run(path).await;
        assert_eq!(ctx.status, 200, "{path}");
        assert_eq!(ctx.content_type.as_deref(), Some(mime::HTML));

        let body = text(&ctx);
        assert_eq!(body.matches(CLIENT_MARKER).count(), 1);
        assert!(body.contains("window.hotUpdate"));
        let client = body.find(CLIENT_MARKER).unwrap();
        assert!(client < body.find("</body>").unwrap());
    }
}

#[tokio::test]
async fn html_already_carrying_client_is_unchanged() {
    let app = vue_app();
    let injected = text(&chain(app.path()).run("/index.html").await);
    write(app.path(), "again.html", &injected);

    let ctx = chain(app.path()).run("/again.html").await;
    assert_eq!(text(&ctx), injected);
}

#[tokio::test]
async fn component_is_compiled() {
    let app = vue_app();
    let ctx = chain(app.path()).run("/src/App.vue").await;

    assert_eq!(ctx.status, 200);
    assert_eq!(ctx.content_type.as_deref(), Some(mime::JAVASCRIPT));
    let body = text(&ctx);
    assert!(body.contains("<h1>{{ title }}</h1>"));
    assert!(body.contains("h1 { color: teal; }"));
    assert!(body.contains(r#"__hmrId = "_src_App_vue""#));
    assert!(body.trim_end().ends_with("export default __sfc_main;"));
}

#[tokio::test]
async fn broken_component_fails_in_console() {
    let app = vue_app();
    write(app.path(), "src/Broken.vue", "<template><div></template>\n<script>export default {}");

    let ctx = chain(app.path()).run("/src/Broken.vue").await;
    assert_eq!(ctx.status, 500);
    assert_eq!(ctx.content_type.as_deref(), Some(mime::JAVASCRIPT));
    let body = text(&ctx);
    assert!(body.contains("console.error("));
    assert!(body.contains("unclosed <script>"));
}

#[tokio::test]
async fn static_files_use_extension_types() {
    let app = vue_app();
    write(app.path(), "public/logo.svg", "<svg/>");
    write(app.path(), "public/blob.bin", [1u8, 2, 3]);
    let chain = chain(app.path());

    let cases = [
        ("/public/data.json", "application/json"),
        ("/public/logo.svg", "image/svg+xml"),
        ("/public/blob.bin", mime::OCTET_STREAM),
    ];
    for (path, expected) in cases {
        let ctx = chain.run(path).await;
        assert_eq!(ctx.status, 200, "{path}");
        assert_eq!(ctx.content_type.as_deref(), Some(expected), "{path}");
    }

    let ctx = chain.run("/public/blob.bin").await;
    assert_eq!(ctx.body, Some(Body::Bytes(vec![1, 2, 3])));
}

#[tokio::test]
async fn missing_files_are_not_found() {
    let app = vue_app();
    let chain = chain(app.path());

    for path in ["/nope.js", "/nope.vue", "/nope.css"] {
        let ctx = chain.run(path).await;
        assert_eq!(ctx.status, 404, "{path}");
        assert!(ctx.body.is_none(), "{path}");
    }
}

#[tokio::test]
async fn paths_outside_root_are_not_found() {
    let outer = tempfile::tempdir().unwrap();
    write(outer.path(), "secret.js", "export const key = 1;");
    write(outer.path(), "site/index.html", "<body></body>");
    let chain = chain(&outer.path().join("site"));

    assert_eq!(chain.run("/../secret.js").await.status, 404);
    assert_eq!(chain.run("/%2E%2E/secret.js").await.status, 404);
}

#[tokio::test]
async fn unresolved_bare_import_is_left_as_written() {
    let app = vue_app();
    write(app.path(), "src/extra.js", "import missing from 'not-installed';\n");

    let ctx = chain(app.path()).run("/src/extra.js").await;
    assert_eq!(ctx.status, 200);
    assert_eq!(text(&ctx), "import missing from 'not-installed';\n");
}

#[tokio::test]
async fn query_strings_are_ignored() {
    let app = vue_app();
    let ctx = chain(app.path()).run("/src/main.js?t=123").await;
    assert_eq!(ctx.status, 200);
    assert_eq!(ctx.content_type.as_deref(), Some(mime::JAVASCRIPT));
}
