//! HTTP Transport
//!
//! Browser fetch bindings to the task endpoint.

use async_trait::async_trait;
use gloo_net::http::{Request, Response};

use chain_reorder::{ApplyError, DeleteRequest, ReorderRequest, ReorderTransport};

/// Sends requests to the console's task endpoint
#[derive(Debug, Clone)]
pub struct GlooTransport {
    endpoint: String,
}

impl GlooTransport {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self { endpoint: endpoint.into() }
    }
}

fn map_network_error(err: gloo_net::Error) -> ApplyError {
    ApplyError::Network(err.to_string())
}

fn is_html(response: &Response) -> bool {
    response
        .headers()
        .get("content-type")
        .is_some_and(|value| value.to_ascii_lowercase().starts_with("text/html"))
}

/// Turn a non-2xx response into a rejection carrying the body text.
/// HTML error pages are never shown to the user.
async fn check_response(response: Response) -> Result<(), ApplyError> {
    if response.ok() {
        return Ok(());
    }
    let status = response.status();
    let body = if is_html(&response) {
        String::new()
    } else {
        response.text().await.unwrap_or_default()
    };
    Err(ApplyError::rejected(status, &body))
}

#[async_trait(?Send)]
impl ReorderTransport for GlooTransport {
    async fn put_order(&self, request: &ReorderRequest) -> Result<(), ApplyError> {
        let response = Request::put(&self.endpoint)
            .json(request)
            .map_err(map_network_error)?
            .send()
            .await
            .map_err(map_network_error)?;
        check_response(response).await
    }

    async fn delete_task(&self, request: &DeleteRequest) -> Result<(), ApplyError> {
        let response = Request::delete(&request.url(&self.endpoint))
            .send()
            .await
            .map_err(map_network_error)?;
        check_response(response).await
    }
}
