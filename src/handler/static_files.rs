//! Static asset serving module
//!
//! Fallback for GET/HEAD requests the route table does not know. Handles
//! file loading, MIME type detection, conditional requests, and response
//! building.

use crate::config::StaticFilesConfig;
use crate::handler::router::RequestContext;
use crate::http::{self, cache, mime};
use crate::logger;
use http_body_util::Full;
use hyper::body::Bytes;
use hyper::Response;
use std::path::Path;
use tokio::fs;

/// Try to serve a static asset for the request path
///
/// Returns `None` when no file backs the path, letting the caller produce
/// the 404.
pub async fn try_serve(
    ctx: &RequestContext<'_>,
    cfg: &StaticFilesConfig,
) -> Option<Response<Full<Bytes>>> {
    let (content, content_type) = load_asset(&cfg.dir, ctx.path, &cfg.index_files).await?;
    Some(build_response(
        &content,
        content_type,
        ctx.if_none_match.as_deref(),
        ctx.is_head,
    ))
}

/// Load an asset from the static directory with index file support
async fn load_asset(
    static_dir: &str,
    path: &str,
    index_files: &[String],
) -> Option<(Vec<u8>, &'static str)> {
    // Remove leading slash and prevent directory traversal
    let clean_path = path.trim_start_matches('/').replace("..", "");

    let mut file_path = Path::new(static_dir).join(&clean_path);

    // Security: ensure file_path is within static_dir
    let static_dir_canonical = Path::new(static_dir).canonicalize().ok()?;

    // Check if path is a directory, try index files
    if file_path.is_dir() || clean_path.is_empty() || clean_path.ends_with('/') {
        for index_file in index_files {
            let index_path = file_path.join(index_file);
            if index_path.exists() && index_path.is_file() {
                file_path = index_path;
                break;
            }
        }
    }

    // File not found is common (404), no need to log at warning level
    let file_path_canonical = file_path.canonicalize().ok()?;
    if !file_path_canonical.starts_with(&static_dir_canonical) {
        logger::log_warning(&format!(
            "Path traversal attempt blocked: {} -> {}",
            path,
            file_path_canonical.display()
        ));
        return None;
    }

    let content = match fs::read(&file_path).await {
        Ok(c) => c,
        Err(_) => return None,
    };

    let content_type = mime::get_content_type(file_path.extension().and_then(|e| e.to_str()));

    Some((content, content_type))
}

/// Build asset response with `ETag` support
fn build_response(
    data: &[u8],
    content_type: &str,
    if_none_match: Option<&str>,
    is_head: bool,
) -> Response<Full<Bytes>> {
    let etag = cache::generate_etag(data);

    // Check if client has cached version
    if cache::check_etag_match(if_none_match, &etag) {
        return http::build_304_response(&etag);
    }

    http::response::build_static_file_response(data, content_type, &etag, is_head)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_fixture(dir: &Path, name: &str, content: &[u8]) {
        std::fs::create_dir_all(dir).unwrap();
        std::fs::write(dir.join(name), content).unwrap();
    }

    fn fixture_root(tag: &str) -> std::path::PathBuf {
        let dir = std::env::temp_dir().join(format!("demo-api-static-{tag}-{}", std::process::id()));
        let _ = std::fs::remove_dir_all(&dir);
        dir
    }

    #[tokio::test]
    async fn test_load_asset_by_path() {
        let root = fixture_root("load");
        write_fixture(&root, "style.css", b"body {}");

        let loaded = load_asset(root.to_str().unwrap(), "/style.css", &[]).await;
        let (content, content_type) = loaded.unwrap();
        assert_eq!(content, b"body {}");
        assert_eq!(content_type, "text/css");
    }

    #[tokio::test]
    async fn test_missing_asset_is_none() {
        let root = fixture_root("missing");
        write_fixture(&root, "present.txt", b"x");

        assert!(load_asset(root.to_str().unwrap(), "/absent.txt", &[])
            .await
            .is_none());
    }

    #[tokio::test]
    async fn test_index_file_resolution() {
        let root = fixture_root("index");
        write_fixture(&root, "index.html", b"<html></html>");

        let loaded = load_asset(
            root.to_str().unwrap(),
            "/",
            &["index.html".to_string()],
        )
        .await;
        let (content, content_type) = loaded.unwrap();
        assert_eq!(content, b"<html></html>");
        assert_eq!(content_type, "text/html; charset=utf-8");
    }

    #[tokio::test]
    async fn test_traversal_is_blocked() {
        let root = fixture_root("traversal");
        write_fixture(&root, "safe.txt", b"safe");

        assert!(
            load_asset(root.to_str().unwrap(), "/../../etc/passwd", &[])
                .await
                .is_none()
        );
    }

    #[tokio::test]
    async fn test_etag_match_yields_304() {
        let root = fixture_root("etag");
        write_fixture(&root, "app.js", b"console.log(1)");
        let etag = cache::generate_etag(b"console.log(1)");

        let ctx = RequestContext {
            path: "/app.js",
            is_head: false,
            if_none_match: Some(etag),
        };
        let cfg = StaticFilesConfig {
            enabled: true,
            dir: root.to_str().unwrap().to_string(),
            index_files: vec![],
        };
        let resp = try_serve(&ctx, &cfg).await.unwrap();
        assert_eq!(resp.status(), 304);
    }
}
