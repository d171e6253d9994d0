//! Static image assets.

use std::path::Path;

use axum::body::Body;
use axum::http::header::CACHE_CONTROL;
use axum::http::{HeaderValue, Request};
use tower::ServiceExt;
use tower::util::MapRequest;
use tower_http::services::ServeDir;
use tower_http::set_header::SetResponseHeader;

type LogRequest = fn(Request<Body>) -> Request<Body>;

/// Serves files from `dir`, logging each request under the `images` target.
///
/// Responses may be cached by clients for a day.
pub fn service(
    dir: impl AsRef<Path>,
) -> SetResponseHeader<MapRequest<ServeDir, LogRequest>, HeaderValue> {
    let files = ServeDir::new(dir).map_request(log_request as LogRequest);
    SetResponseHeader::if_not_present(
        files,
        CACHE_CONTROL,
        HeaderValue::from_static("public, max-age=86400"),
    )
}

fn log_request(req: Request<Body>) -> Request<Body> {
    tracing::info!(target: "images", method = %req.method(), uri = %req.uri(), "image request");
    req
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    fn temp_dir_with(file: &str, contents: &str) -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(file), contents).unwrap();
        dir
    }

    #[tokio::test]
    async fn serves_files_with_cache_header() {
        let dir = temp_dir_with("logo.svg", "<svg/>");

        let response = service(dir.path())
            .oneshot(Request::builder().uri("/logo.svg").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[CACHE_CONTROL], "public, max-age=86400");
    }

    #[tokio::test]
    async fn missing_file_is_not_found() {
        let dir = temp_dir_with("present.svg", "<svg/>");

        let response = service(dir.path())
            .oneshot(Request::builder().uri("/absent.svg").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
