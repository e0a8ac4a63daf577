pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::notify::handlers as notify;
use crate::results::handlers as results;
use crate::screening::handlers as screening;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let body_limit = state.config.max_upload_bytes;

    Router::new()
        .route("/health", get(health::health_handler))
        // Screening API
        .route("/api/v1/screenings", post(screening::handle_screen))
        // Results API
        .route("/api/v1/results", get(results::handle_results_summary))
        .route(
            "/api/v1/results/download",
            get(results::handle_download_results),
        )
        // Email API
        .route("/api/v1/emails", post(notify::handle_send_emails))
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use axum::{
        body::Body,
        http::{header, Request, StatusCode},
        response::Response,
    };
    use serde_json::Value;
    use tower::ServiceExt;
    use uuid::Uuid;

    use super::*;
    use crate::config::Config;
    use crate::results::store::write_results;
    use crate::screening::normalizer::normalize_response;
    use crate::session::session_cookie;

    const BOUNDARY: &str = "screener-test-boundary";

    fn test_state(results_dir: &std::path::Path) -> AppState {
        AppState::new(Config {
            results_dir: results_dir.to_path_buf(),
            llm_request_delay: std::time::Duration::ZERO,
            ..Config::default()
        })
    }

    enum Part<'a> {
        Text(&'a str, &'a str),
        File(&'a str, &'a str, &'a [u8]),
    }

    fn multipart_body(parts: &[Part]) -> Vec<u8> {
        let mut body = Vec::new();
        for part in parts {
            body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
            match part {
                Part::Text(name, value) => {
                    body.extend_from_slice(
                        format!("Content-Disposition: form-data; name=\"{name}\"\r\n\r\n")
                            .as_bytes(),
                    );
                    body.extend_from_slice(value.as_bytes());
                }
                Part::File(name, filename, bytes) => {
                    body.extend_from_slice(
                        format!(
                            "Content-Disposition: form-data; name=\"{name}\"; filename=\"{filename}\"\r\n\
                             Content-Type: application/octet-stream\r\n\r\n"
                        )
                        .as_bytes(),
                    );
                    body.extend_from_slice(bytes);
                }
            }
            body.extend_from_slice(b"\r\n");
        }
        body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
        body
    }

    fn screening_request(parts: &[Part]) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/api/v1/screenings")
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(multipart_body(parts)))
            .unwrap()
    }

    async fn json_body(response: Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let dir = tempfile::tempdir().unwrap();
        let response = build_router(test_state(dir.path()))
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_body(response).await["status"], "ok");
    }

    #[tokio::test]
    async fn test_screening_requires_job_description() {
        let dir = tempfile::tempdir().unwrap();
        let request = screening_request(&[
            Part::Text("job_description", "   "),
            Part::Text("api_key", "key"),
            Part::File("pdf_files", "cv.pdf", b"%PDF"),
        ]);
        let response = build_router(test_state(dir.path()))
            .oneshot(request)
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            json_body(response).await["error"]["message"],
            "Please enter a job description"
        );
    }

    #[tokio::test]
    async fn test_screening_requires_api_key() {
        let dir = tempfile::tempdir().unwrap();
        let request = screening_request(&[
            Part::Text("job_description", "Rust engineer"),
            Part::File("pdf_files", "cv.pdf", b"%PDF"),
        ]);
        let response = build_router(test_state(dir.path()))
            .oneshot(request)
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            json_body(response).await["error"]["message"],
            "Please enter your LLM API key"
        );
    }

    #[tokio::test]
    async fn test_screening_requires_files() {
        let dir = tempfile::tempdir().unwrap();
        let request = screening_request(&[
            Part::Text("job_description", "Rust engineer"),
            Part::Text("api_key", "key"),
        ]);
        let response = build_router(test_state(dir.path()))
            .oneshot(request)
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            json_body(response).await["error"]["message"],
            "Please select PDF files to upload"
        );
    }

    #[tokio::test]
    async fn test_screening_rejects_non_pdf_uploads() {
        let dir = tempfile::tempdir().unwrap();
        let request = screening_request(&[
            Part::Text("job_description", "Rust engineer"),
            Part::Text("api_key", "key"),
            Part::File("pdf_files", "cv.docx", b"not a pdf"),
        ]);
        let response = build_router(test_state(dir.path()))
            .oneshot(request)
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            json_body(response).await["error"]["message"],
            "No valid PDF files found"
        );
    }

    #[tokio::test]
    async fn test_screening_rejects_bad_temperature() {
        let dir = tempfile::tempdir().unwrap();
        let request = screening_request(&[
            Part::Text("job_description", "Rust engineer"),
            Part::Text("api_key", "key"),
            Part::Text("temperature", "warm"),
            Part::File("pdf_files", "cv.pdf", b"%PDF"),
        ]);
        let response = build_router(test_state(dir.path()))
            .oneshot(request)
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_oversized_upload_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let state = AppState::new(Config {
            results_dir: dir.path().to_path_buf(),
            max_upload_bytes: 1024,
            ..Config::default()
        });
        let big = vec![b'x'; 4096];
        let request = screening_request(&[
            Part::Text("job_description", "Rust engineer"),
            Part::Text("api_key", "key"),
            Part::File("pdf_files", "cv.pdf", &big),
        ]);
        let response = build_router(state).oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    }

    #[tokio::test]
    async fn test_results_without_session_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let response = build_router(test_state(dir.path()))
            .oneshot(Request::get("/api/v1/results").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(
            json_body(response).await["error"]["message"],
            "No results file found. Please run analysis first."
        );
    }

    #[tokio::test]
    async fn test_results_summary_and_download_for_session() {
        let dir = tempfile::tempdir().unwrap();
        let state = test_state(dir.path());
        let path = write_results(
            dir.path(),
            &[
                normalize_response(r#"{"name": "Low", "score": "40%"}"#),
                normalize_response(r#"{"name": "High", "score": "90%", "is_perfect": true}"#),
            ],
        )
        .unwrap();
        let session = Uuid::new_v4();
        state.sessions.set_latest_results(session, path).await;
        let cookie = session_cookie(session);
        let cookie_pair = cookie.split(';').next().unwrap().to_string();

        let router = build_router(state);

        let response = router
            .clone()
            .oneshot(
                Request::get("/api/v1/results")
                    .header(header::COOKIE, &cookie_pair)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let summary = json_body(response).await;
        assert_eq!(summary["total_resumes"], 2);
        assert_eq!(summary["perfect_candidates"], 1);
        assert_eq!(summary["avg_score"], 65.0);
        assert_eq!(summary["results"][0]["Name"], "High");

        let response = router
            .oneshot(
                Request::get("/api/v1/results/download")
                    .header(header::COOKIE, &cookie_pair)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::CONTENT_DISPOSITION],
            "attachment; filename=\"resume_analysis_results.csv\""
        );
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let csv = String::from_utf8(bytes.to_vec()).unwrap();
        assert!(csv.starts_with("Name,"));
        assert!(csv.contains("Lack of Knowledge"));
        assert!(csv.contains("Low"));
    }

    fn cookie_pair(response: &Response) -> String {
        let set_cookie = response.headers()[header::SET_COOKIE].to_str().unwrap();
        set_cookie.split(';').next().unwrap().to_string()
    }

    #[tokio::test]
    async fn test_screening_unreadable_pdf_records_error_and_sets_session() {
        let dir = tempfile::tempdir().unwrap();
        let router = build_router(test_state(dir.path()));
        let parts = [
            Part::Text("job_description", "Rust engineer"),
            Part::Text("api_key", "key"),
            Part::File("pdf_files", "cv.pdf", b"definitely not a pdf"),
        ];

        let response = router
            .clone()
            .oneshot(screening_request(&parts))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let cookie = cookie_pair(&response);
        assert!(cookie.starts_with("screener_session="));

        let body = json_body(response).await;
        assert_eq!(body["success"], true);
        assert_eq!(body["message"], "Successfully processed 1 resume(s)");
        let results = body["results"].as_array().unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0]["Name"], "Error: cv.pdf");
        assert_eq!(results[0]["strong zone"], "Could not extract text");
        let results_file = std::path::PathBuf::from(body["results_file"].as_str().unwrap());
        assert!(results_file.starts_with(dir.path()));
        assert!(results_file.exists());

        let response = router
            .clone()
            .oneshot(
                Request::get("/api/v1/results")
                    .header(header::COOKIE, &cookie)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let summary = json_body(response).await;
        assert_eq!(summary["total_resumes"], 1);
        assert_eq!(summary["results"][0]["Name"], "Error: cv.pdf");

        // A second upload from the same browser keeps its session id.
        let mut request = screening_request(&parts);
        request
            .headers_mut()
            .insert(header::COOKIE, cookie.parse().unwrap());
        let response = router.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(cookie_pair(&response), cookie);
    }

    #[tokio::test]
    async fn test_emails_require_credentials() {
        let dir = tempfile::tempdir().unwrap();
        let response = build_router(test_state(dir.path()))
            .oneshot(
                Request::post("/api/v1/emails")
                    .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                    .body(Body::from("sender_email=hr%40example.com"))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            json_body(response).await["error"]["message"],
            "Please provide sender email and password"
        );
    }

    #[tokio::test]
    async fn test_emails_require_results() {
        let dir = tempfile::tempdir().unwrap();
        let response = build_router(test_state(dir.path()))
            .oneshot(
                Request::post("/api/v1/emails")
                    .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                    .body(Body::from(
                        "sender_email=hr%40example.com&sender_password=secret",
                    ))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            json_body(response).await["error"]["message"],
            "No results file found. Please run analysis first."
        );
    }
}
