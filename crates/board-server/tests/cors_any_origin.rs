use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use board_db::{create_pool, run_migrations, DbRuntimeSettings};
use board_server::{app, AppState};
use tower::ServiceExt;

fn build_app() -> Router {
    let pool = create_pool(board_db::IN_MEMORY, DbRuntimeSettings::default()).unwrap();
    {
        let conn = pool.get().unwrap();
        run_migrations(&conn).unwrap();
    }

    app(AppState {
        pool,
        frontend_dir: "/nonexistent/board-frontend".to_string(),
    })
}

#[tokio::test]
async fn preflight_allows_any_origin() {
    let app = build_app();

    for origin in ["http://localhost:5173", "https://board.example.org"] {
        let request = Request::builder()
            .method(Method::OPTIONS)
            .uri("/api/question")
            .header(header::ORIGIN, origin)
            .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
            .header(header::ACCESS_CONTROL_REQUEST_HEADERS, "content-type")
            .body(Body::empty())
            .unwrap();

        let response = app.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK, "preflight for {origin}");

        let headers = response.headers();
        assert_eq!(
            headers
                .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
                .and_then(|v| v.to_str().ok()),
            Some("*")
        );
        assert!(
            headers.contains_key(header::ACCESS_CONTROL_ALLOW_METHODS),
            "allowed methods should be advertised"
        );
        assert!(
            headers.contains_key(header::ACCESS_CONTROL_ALLOW_HEADERS),
            "allowed headers should be advertised"
        );
    }
}

#[tokio::test]
async fn simple_request_carries_allow_origin() {
    let app = build_app();

    let request = Request::builder()
        .uri("/question")
        .header(header::ORIGIN, "http://mars.local")
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response
            .headers()
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .and_then(|v| v.to_str().ok()),
        Some("*")
    );
}
