//! W3C WebDriver client over `reqwest`.
//!
//! Speaks the JSON wire protocol to chromedriver/geckodriver: one session per
//! connection, elements addressed by their web-element reference.

use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Method};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{debug, info};

use super::{BrowserDriver, BrowserError, ElementId};

/// Key under which WebDriver returns element references.
const ELEMENT_KEY: &str = "element-6066-11e4-a52e-4a5d5b8e6b8d";
const COMMAND_TIMEOUT: Duration = Duration::from_secs(60);

#[derive(Debug, Deserialize)]
struct WireResponse {
    #[serde(default)]
    value: Value,
}

#[derive(Debug, Deserialize)]
struct WireError {
    error: String,
    #[serde(default)]
    message: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct NewSession {
    session_id: String,
}

/// An open WebDriver session.
pub struct WebDriverSession {
    client: Client,
    session_url: String,
}

impl WebDriverSession {
    /// Starts a browser session on the WebDriver server at `server_url`.
    pub async fn connect(server_url: &str, headless: bool) -> Result<Self, BrowserError> {
        let client = Client::builder().timeout(COMMAND_TIMEOUT).build()?;
        let server_url = server_url.trim_end_matches('/');

        let value = send(
            &client,
            Method::POST,
            &format!("{server_url}/session"),
            Some(capabilities(headless)),
        )
        .await?;
        let session: NewSession = serde_json::from_value(value)
            .map_err(|e| BrowserError::Protocol(format!("new session: {e}")))?;

        info!(
            "WebDriver session {} started (headless: {})",
            session.session_id, headless
        );
        Ok(Self {
            client,
            session_url: format!("{server_url}/session/{}", session.session_id),
        })
    }

    async fn command(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
    ) -> Result<Value, BrowserError> {
        send(
            &self.client,
            method,
            &format!("{}{}", self.session_url, path),
            body,
        )
        .await
    }

    async fn element_command(
        &self,
        element: &ElementId,
        path: &str,
        body: Value,
    ) -> Result<(), BrowserError> {
        self.command(
            Method::POST,
            &format!("/element/{}{}", element.as_str(), path),
            Some(body),
        )
        .await
        .map(|_| ())
    }

    async fn send_keys(&self, element: &ElementId, text: &str) -> Result<(), BrowserError> {
        self.element_command(element, "/value", json!({ "text": text }))
            .await
    }
}

fn capabilities(headless: bool) -> Value {
    let args: Vec<&str> = if headless {
        vec!["--headless=new"]
    } else {
        Vec::new()
    };
    let firefox_args: Vec<&str> = if headless { vec!["-headless"] } else { Vec::new() };
    json!({
        "capabilities": {
            "alwaysMatch": {
                "goog:chromeOptions": { "args": args },
                "moz:firefoxOptions": { "args": firefox_args }
            }
        }
    })
}

/// Sends one command and unwraps the `value` envelope, mapping WebDriver
/// error payloads to [`BrowserError::WebDriver`].
async fn send(
    client: &Client,
    method: Method,
    url: &str,
    body: Option<Value>,
) -> Result<Value, BrowserError> {
    debug!("WebDriver {} {}", method, url);
    let mut request = client.request(method, url);
    if let Some(body) = body {
        request = request.json(&body);
    }
    let response = request.send().await?;
    let status = response.status();
    let text = response.text().await?;

    let wire: WireResponse = serde_json::from_str(&text).map_err(|_| {
        BrowserError::Protocol(format!("status {status}, non-JSON body: {text}"))
    })?;

    if !status.is_success() {
        let err: WireError = serde_json::from_value(wire.value).map_err(|_| {
            BrowserError::Protocol(format!("status {status} without error payload"))
        })?;
        return Err(BrowserError::WebDriver {
            error: err.error,
            message: err.message,
        });
    }

    Ok(wire.value)
}

fn parse_elements(value: Value) -> Result<Vec<ElementId>, BrowserError> {
    let Value::Array(items) = value else {
        return Err(BrowserError::Protocol(format!(
            "expected element list, got {value}"
        )));
    };
    items
        .iter()
        .map(|item| {
            item.get(ELEMENT_KEY)
                .and_then(Value::as_str)
                .map(|id| ElementId(id.to_string()))
                .ok_or_else(|| BrowserError::Protocol(format!("not an element reference: {item}")))
        })
        .collect()
}

fn locator(css: &str) -> Value {
    json!({ "using": "css selector", "value": css })
}

#[async_trait]
impl BrowserDriver for WebDriverSession {
    async fn goto(&self, url: &str) -> Result<(), BrowserError> {
        self.command(Method::POST, "/url", Some(json!({ "url": url })))
            .await
            .map(|_| ())
    }

    async fn find_all(&self, css: &str) -> Result<Vec<ElementId>, BrowserError> {
        let value = self
            .command(Method::POST, "/elements", Some(locator(css)))
            .await?;
        parse_elements(value)
    }

    async fn find_all_within(
        &self,
        parent: &ElementId,
        css: &str,
    ) -> Result<Vec<ElementId>, BrowserError> {
        let path = format!("/element/{}/elements", parent.as_str());
        let value = self
            .command(Method::POST, &path, Some(locator(css)))
            .await?;
        parse_elements(value)
    }

    async fn fill(&self, element: &ElementId, text: &str) -> Result<(), BrowserError> {
        self.element_command(element, "/clear", json!({})).await?;
        self.send_keys(element, text).await
    }

    async fn upload(&self, element: &ElementId, path: &Path) -> Result<(), BrowserError> {
        // The driver reads the file itself, so it needs an absolute path.
        let absolute = std::fs::canonicalize(path).map_err(|source| BrowserError::File {
            path: path.to_path_buf(),
            source,
        })?;
        self.send_keys(element, &absolute.to_string_lossy()).await
    }

    async fn value(&self, element: &ElementId) -> Result<String, BrowserError> {
        let path = format!("/element/{}/property/value", element.as_str());
        let value = self.command(Method::GET, &path, None).await?;
        Ok(value.as_str().unwrap_or_default().to_string())
    }

    async fn attribute(
        &self,
        element: &ElementId,
        name: &str,
    ) -> Result<Option<String>, BrowserError> {
        let path = format!("/element/{}/attribute/{}", element.as_str(), name);
        let value = self.command(Method::GET, &path, None).await?;
        Ok(value.as_str().map(str::to_string))
    }

    async fn select_index(&self, select: &ElementId, index: usize) -> Result<(), BrowserError> {
        let options = self.find_all_within(select, "option").await?;
        let option = options.get(index).ok_or_else(|| {
            BrowserError::Protocol(format!(
                "select has {} option(s), cannot pick index {}",
                options.len(),
                index
            ))
        })?;
        self.element_command(option, "/click", json!({})).await
    }

    async fn close(&self) -> Result<(), BrowserError> {
        self.command(Method::DELETE, "", None).await?;
        info!("WebDriver session closed");
        Ok(())
    }
}
