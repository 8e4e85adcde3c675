//! Shared HTTP plumbing for the service clients

use std::time::Duration;

use reqwest::{Client, Response};
use tracing::{debug, warn};

use crate::error::{Service, TravelPlannerError};
use crate::Result;

/// Build a client with the given timeout and optional `User-Agent`
pub(crate) fn build_client(
    service: Service,
    timeout: Duration,
    user_agent: Option<&str>,
) -> Result<Client> {
    let mut builder = Client::builder().timeout(timeout);
    if let Some(user_agent) = user_agent {
        builder = builder.user_agent(user_agent.to_string());
    }
    builder
        .build()
        .map_err(|e| TravelPlannerError::transport(service, e))
}

/// Turn a non-success response into [`TravelPlannerError::Http`], keeping the body text
pub(crate) async fn ensure_success(service: Service, response: Response) -> Result<Response> {
    let status = response.status();
    debug!("{} responded with {}", service, status);

    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    warn!("{} request failed with {}: {}", service, status, body);
    Err(TravelPlannerError::Http {
        service,
        status: status.as_u16(),
        body,
    })
}

/// Decode a JSON body, reporting shape problems as malformed responses
pub(crate) async fn read_json<T: serde::de::DeserializeOwned>(
    service: Service,
    response: Response,
) -> Result<T> {
    let bytes = response
        .bytes()
        .await
        .map_err(|e| TravelPlannerError::transport(service, e))?;
    serde_json::from_slice(&bytes)
        .map_err(|e| TravelPlannerError::malformed(service, format!("invalid JSON body: {e}")))
}
