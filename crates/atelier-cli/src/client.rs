use anyhow::{Context, Result};
use atelier_core::SectionType;
use serde_json::Value;

pub struct AtelierClient {
    http: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl AtelierClient {
    pub fn new(base_url: &str, token: Option<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            token,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    fn request(&self, method: reqwest::Method, path: &str) -> reqwest::RequestBuilder {
        let mut req = self.http.request(method, self.url(path));
        if let Some(token) = &self.token {
            req = req.bearer_auth(token);
        }
        req.header("Accept", "application/json")
    }

    async fn send(&self, req: reqwest::RequestBuilder) -> Result<Value> {
        let resp = req.send().await.context("Failed to connect to server")?;
        handle_response(resp).await
    }

    pub async fn sections(&self) -> Result<Value> {
        self.send(self.request(reqwest::Method::GET, "/api/admin/sections"))
            .await
    }

    pub async fn section(&self, section: SectionType) -> Result<Value> {
        self.send(self.request(reqwest::Method::GET, &format!("/api/admin/sections/{section}")))
            .await
    }

    pub async fn save_section(&self, section: SectionType, body: &Value) -> Result<Value> {
        let req = self
            .request(reqwest::Method::PUT, &format!("/api/admin/sections/{section}"))
            .json(body);
        self.send(req).await
    }

    pub async fn update_item(&self, section: SectionType, id: &str, patch: &Value) -> Result<Value> {
        let req = self
            .request(
                reqwest::Method::PATCH,
                &format!("/api/admin/sections/{section}/items/{id}"),
            )
            .json(patch);
        self.send(req).await
    }

    pub async fn delete_item(&self, section: SectionType, id: &str) -> Result<Value> {
        self.send(self.request(
            reqwest::Method::DELETE,
            &format!("/api/admin/sections/{section}/items/{id}"),
        ))
        .await
    }

    pub async fn page(&self, locale: &str, page: Option<&str>) -> Result<Value> {
        let path = match page {
            Some(page) => format!("/api/site/{locale}/{page}"),
            None => format!("/api/site/{locale}"),
        };
        self.send(self.request(reqwest::Method::GET, &path)).await
    }

    /// Status code and body of a health endpoint.
    pub async fn probe(&self, path: &str) -> Result<(u16, String)> {
        let resp = self
            .http
            .get(self.url(path))
            .send()
            .await
            .context("Failed to connect to server")?;
        let status = resp.status().as_u16();
        let body = resp.text().await.unwrap_or_default();
        Ok((status, body))
    }
}

async fn handle_response(resp: reqwest::Response) -> Result<Value> {
    let status = resp.status();
    let body = resp.text().await.unwrap_or_default();

    if !status.is_success() {
        anyhow::bail!(describe_failure(status.as_u16(), &body));
    }
    if body.is_empty() {
        return Ok(Value::Null);
    }
    serde_json::from_str(&body).context("Failed to parse response JSON")
}

/// Renders an error envelope (`{ success: false, error: { message, issues } }`)
/// as one line per problem; falls back to the raw body.
fn describe_failure(status: u16, body: &str) -> String {
    let Ok(json) = serde_json::from_str::<Value>(body) else {
        return format!("HTTP {status}: {body}");
    };
    let Some(error) = json.get("error") else {
        return format!("HTTP {status}: {body}");
    };

    let message = error
        .get("message")
        .and_then(Value::as_str)
        .unwrap_or("request failed");
    let mut out = format!("HTTP {status}: {message}");
    if let Some(issues) = error.get("issues").and_then(Value::as_array) {
        for issue in issues {
            let path = issue.get("path").and_then(Value::as_str).unwrap_or("?");
            let msg = issue.get("message").and_then(Value::as_str).unwrap_or("");
            out.push_str(&format!("\n  - {path}: {msg}"));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn describes_validation_envelope() {
        let body = r#"{"success":false,"error":{"kind":"validation","message":"Submitted content is invalid","issues":[{"path":"items[0].data.title","message":"is required"}]}}"#;
        assert_eq!(
            describe_failure(422, body),
            "HTTP 422: Submitted content is invalid\n  - items[0].data.title: is required"
        );
    }

    #[test]
    fn falls_back_to_raw_body() {
        assert_eq!(describe_failure(502, "Bad Gateway"), "HTTP 502: Bad Gateway");
        assert_eq!(describe_failure(500, r#"{"oops":1}"#), r#"HTTP 500: {"oops":1}"#);
    }
}
