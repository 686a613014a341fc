use atelier_api::ApiError;
use axum::{
    body::Body,
    http::{HeaderName, HeaderValue, Method, Request},
    middleware::Next,
    response::{IntoResponse, Response},
};
use uuid::Uuid;

pub const REQUEST_ID_HEADER: &str = "x-request-id";

pub async fn request_id(mut req: Request<Body>, next: Next) -> Response {
    let header_name = HeaderName::from_static(REQUEST_ID_HEADER);

    // Keep a caller-supplied id, otherwise mint one
    let req_id_value = match req.headers().get(&header_name) {
        Some(value) => value.clone(),
        None => HeaderValue::from_str(&Uuid::new_v4().to_string())
            .unwrap_or_else(|_| HeaderValue::from_static("unknown")),
    };

    // Visible to the trace span
    req.extensions_mut().insert(req_id_value.clone());

    let mut res = next.run(req).await;
    res.headers_mut().insert(header_name, req_id_value);
    res
}

// Only JSON is spoken: Accept must allow it and request bodies must declare it.
pub async fn content_negotiation(req: Request<Body>, next: Next) -> Response {
    let accept_ok = req
        .headers()
        .get("accept")
        .and_then(|v| v.to_str().ok())
        .map(|v| {
            let v = v.to_ascii_lowercase();
            v.contains("application/json") || v.contains("*/*") || v.contains("application/*")
        })
        .unwrap_or(true);

    if !accept_ok {
        return ApiError::bad_request("Only application/json responses are available")
            .into_response();
    }

    let method = req.method();
    let has_body = method == Method::POST || method == Method::PUT || method == Method::PATCH;
    if has_body {
        let content_ok = req
            .headers()
            .get("content-type")
            .and_then(|v| v.to_str().ok())
            .map(|s| s.to_ascii_lowercase().starts_with("application/json"))
            .unwrap_or(false);
        if !content_ok {
            return ApiError::bad_request("Content-Type must be application/json").into_response();
        }
    }

    next.run(req).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{Router, http::StatusCode, middleware, routing::get};
    use tower::ServiceExt;

    fn app() -> Router {
        Router::new()
            .route("/", get(|| async { "ok" }).put(|| async { "ok" }))
            .layer(middleware::from_fn(request_id))
            .layer(middleware::from_fn(content_negotiation))
    }

    #[tokio::test]
    async fn request_id_is_generated_and_preserved() {
        let res = app()
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert!(res.headers().get(REQUEST_ID_HEADER).is_some());

        let res = app()
            .oneshot(
                Request::builder()
                    .uri("/")
                    .header(REQUEST_ID_HEADER, "abc-123")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(res.headers().get(REQUEST_ID_HEADER).unwrap(), "abc-123");
    }

    #[tokio::test]
    async fn put_requires_json_content_type() {
        let res = app()
            .oneshot(
                Request::builder()
                    .method(Method::PUT)
                    .uri("/")
                    .header("content-type", "text/plain")
                    .body(Body::from("hi"))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn non_json_accept_rejected() {
        let res = app()
            .oneshot(
                Request::builder()
                    .uri("/")
                    .header("accept", "text/html")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    }
}
