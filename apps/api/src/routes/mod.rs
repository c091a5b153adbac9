pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::analysis::handlers as analysis;
use crate::recommendations::handlers as recommendations;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let body_limit = state.config.max_upload_bytes();

    Router::new()
        .route("/health", get(health::health_handler))
        // Analysis API
        .route("/api/v1/analyze", post(analysis::handle_analyze))
        .route("/api/v1/experience", post(analysis::handle_experience))
        .route("/api/v1/score", post(analysis::handle_score))
        .route("/api/v1/ats", post(analysis::handle_ats))
        .route("/api/v1/match", post(analysis::handle_match))
        // Recommendations API
        .route("/api/v1/roles", get(recommendations::handle_roles))
        .route(
            "/api/v1/recommendations",
            get(recommendations::handle_recommendations),
        )
        .route(
            "/api/v1/learning-plan",
            post(recommendations::handle_learning_plan),
        )
        .route(
            "/api/v1/learning-plan/csv",
            post(recommendations::handle_learning_plan_csv),
        )
        .route(
            "/api/v1/learning-plan/json",
            post(recommendations::handle_learning_plan_json),
        )
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{
        body::{to_bytes, Body},
        http::{header, Request, StatusCode},
        response::Response,
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use super::*;
    use crate::config::Config;
    use crate::extraction::fields::parse_fields;
    use crate::extraction::{ExtractError, FieldExtractor, PdfFieldExtractor};
    use crate::models::resume::ResumeRecord;
    use crate::recommendations::catalog::CourseCatalog;

    /// Treats uploads as UTF-8 text so router tests need no real PDFs.
    struct PlainTextExtractor;

    impl FieldExtractor for PlainTextExtractor {
        fn extract(&self, bytes: &[u8]) -> Result<ResumeRecord, ExtractError> {
            let text = std::str::from_utf8(bytes).map_err(|e| ExtractError::Decode(e.to_string()))?;
            if text.trim().is_empty() {
                return Err(ExtractError::NoText);
            }
            Ok(parse_fields(text))
        }
    }

    const BOUNDARY: &str = "resume-analyzer-test-boundary";

    const RESUME: &str = "Jane Doe\njane@example.com | +1 555 010 0199\n\nExperience\nAcme Corp | Jan 2019 - Dec 2020\nGlobex Inc | 2021 - Present\n- Built Python and SQL services\n\nEducation\nB.Tech, State University\n";

    fn app_with(extractor: Arc<dyn FieldExtractor>, config: Config) -> Router {
        build_router(AppState {
            config,
            extractor,
            catalog: Arc::new(CourseCatalog::embedded().unwrap()),
            geo: None,
        })
    }

    fn app() -> Router {
        app_with(Arc::new(PlainTextExtractor), Config::default())
    }

    fn multipart_body(parts: &[(&str, &str)]) -> String {
        let mut body = String::new();
        for (name, value) in parts {
            body.push_str(&format!("--{BOUNDARY}\r\n"));
            if *name == "resume" {
                body.push_str(
                    "Content-Disposition: form-data; name=\"resume\"; filename=\"cv.pdf\"\r\nContent-Type: application/pdf\r\n\r\n",
                );
            } else {
                body.push_str(&format!(
                    "Content-Disposition: form-data; name=\"{name}\"\r\n\r\n"
                ));
            }
            body.push_str(value);
            body.push_str("\r\n");
        }
        body.push_str(&format!("--{BOUNDARY}--\r\n"));
        body
    }

    fn multipart_request(body: String) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/api/v1/analyze")
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(body))
            .unwrap()
    }

    fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn json_body(response: Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let response = app()
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["status"], "ok");
        assert_eq!(body["service"], "resume-analyzer");
    }

    #[tokio::test]
    async fn test_analyze_upload() {
        let body = multipart_body(&[
            ("resume", RESUME),
            ("job_description", "Python, SQL and Excel"),
            ("target_role", "Other"),
            ("custom_role", "Data Analyst"),
        ]);
        let response = app().oneshot(multipart_request(body)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let report = json_body(response).await;
        assert_eq!(report["target_role"], "Data Analyst");
        assert_eq!(report["job_match"]["match_percentage"], 66.7);
        assert_eq!(report["recommendations"]["track"], "data-science");
        assert_eq!(report["file_id"].as_str().unwrap().len(), 64);
        assert!(report["quality"]["total"].as_u64().unwrap() <= 100);
        assert!(report["location"].is_null());
    }

    #[tokio::test]
    async fn test_analyze_requires_resume_field() {
        let body = multipart_body(&[("job_description", "Python")]);
        let response = app().oneshot(multipart_request(body)).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_analyze_decodes_a_real_pdf() {
        let pdf = std::str::from_utf8(include_bytes!("../../testdata/resume.pdf")).unwrap();
        let app = app_with(Arc::new(PdfFieldExtractor), Config::default());
        let body = multipart_body(&[("resume", pdf), ("job_description", "Python, SQL and Excel")]);
        let response = app.oneshot(multipart_request(body)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let report = json_body(response).await;
        assert_eq!(report["record"]["name"], "Jane Doe");
        assert_eq!(report["record"]["email"], "jane@example.com");
        assert_eq!(report["job_match"]["match_percentage"], 66.7);
        assert_eq!(report["experience"]["years"], 2.0);
    }

    #[tokio::test]
    async fn test_non_pdf_upload_is_unprocessable() {
        let app = app_with(Arc::new(PdfFieldExtractor), Config::default());
        let body = multipart_body(&[("resume", "this is not a pdf")]);
        let response = app.oneshot(multipart_request(body)).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

        let error = json_body(response).await;
        assert_eq!(error["error"]["code"], "UNABLE_TO_READ_RESUME");
        assert!(error["error"]["message"]
            .as_str()
            .unwrap()
            .starts_with("Unable to read resume"));
    }

    #[tokio::test]
    async fn test_oversized_upload_is_rejected() {
        let config = Config {
            max_upload_mb: 1,
            ..Config::default()
        };
        let app = app_with(Arc::new(PlainTextExtractor), config);
        let huge = "a".repeat(2 * 1024 * 1024);
        let body = multipart_body(&[("resume", &huge)]);
        let response = app.oneshot(multipart_request(body)).await.unwrap();
        assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    }

    #[tokio::test]
    async fn test_experience_endpoint() {
        let response = app()
            .oneshot(json_request(
                "POST",
                "/api/v1/experience",
                json!({
                    "text": "Jan 2019 - Dec 2020\n2021 - Present",
                    "as_of": "2024-01-01"
                }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["years"], 5.0);
        assert_eq!(body["policy"], "merge");
    }

    #[tokio::test]
    async fn test_experience_from_phrases_with_additive_policy() {
        let response = app()
            .oneshot(json_request(
                "POST",
                "/api/v1/experience",
                json!({
                    "phrases": ["Jan 2020 - Dec 2021", "Jan 2021 - Dec 2021"],
                    "as_of": "2024-01-01",
                    "policy": "additive"
                }),
            ))
            .await
            .unwrap();
        let body = json_body(response).await;
        assert_eq!(body["years"], 3.0);
        assert_eq!(body["ranges"].as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_score_endpoint_on_empty_record() {
        let response = app()
            .oneshot(json_request("POST", "/api/v1/score", json!({})))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["total"], 0);
        assert_eq!(body["label"], "needs_work");
        assert_eq!(body["feedback"].as_array().unwrap().len(), 7);
    }

    #[tokio::test]
    async fn test_ats_endpoint() {
        let response = app()
            .oneshot(json_request(
                "POST",
                "/api/v1/ats",
                json!({
                    "record": { "skills": ["Python"] },
                    "job_description": "python developer"
                }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["keyword_match"]["matched"], json!(["python"]));
    }

    #[tokio::test]
    async fn test_match_endpoint() {
        let response = app()
            .oneshot(json_request(
                "POST",
                "/api/v1/match",
                json!({
                    "skills": ["Python", "SQL"],
                    "job_description": "Python, SQL and Excel"
                }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["match_percentage"], 66.7);
        assert_eq!(body["missing_skills"], json!(["excel"]));
    }

    #[tokio::test]
    async fn test_match_rejects_blank_job_description() {
        let response = app()
            .oneshot(json_request(
                "POST",
                "/api/v1/match",
                json!({ "skills": ["python"], "job_description": "  " }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = json_body(response).await;
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_recommendations_for_unknown_role() {
        let response = app()
            .oneshot(
                Request::get("/api/v1/recommendations?role=Astronaut")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["source"], "general");
        assert_eq!(body["courses"].as_array().unwrap().len(), 6);
    }

    #[tokio::test]
    async fn test_recommendations_by_skills() {
        let response = app()
            .oneshot(
                Request::get("/api/v1/recommendations?skills=Figma,%20sketching")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        let body = json_body(response).await;
        assert_eq!(body["source"], "skill_tags");
        assert_eq!(body["courses"].as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_roles() {
        let response = app()
            .oneshot(Request::get("/api/v1/roles").body(Body::empty()).unwrap())
            .await
            .unwrap();
        let body = json_body(response).await;
        assert_eq!(body["roles"].as_array().unwrap().len(), 14);
    }

    #[tokio::test]
    async fn test_learning_plan_csv_download() {
        let response = app()
            .oneshot(json_request(
                "POST",
                "/api/v1/learning-plan/csv",
                json!({ "target_role": "Android Developer" }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "text/csv; charset=utf-8"
        );
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let csv = String::from_utf8(bytes.to_vec()).unwrap();
        assert_eq!(csv.lines().count(), 3);
        assert!(csv.starts_with("title,url,provider,level,is_free,role_tracks,tags,relevance_score"));
    }

    #[tokio::test]
    async fn test_learning_plan_json() {
        let response = app()
            .oneshot(json_request(
                "POST",
                "/api/v1/learning-plan",
                json!({ "free_only": true, "max_results": 3 }),
            ))
            .await
            .unwrap();
        let body = json_body(response).await;
        let courses = body["courses"].as_array().unwrap();
        assert_eq!(courses.len(), 3);
        assert!(courses.iter().all(|c| c["is_free"] == true));
    }
}
