use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use shared::{
    domain::{HostRecord, ObjUuid},
    error::{ApiError, ErrorCode},
    protocol::{
        ContextMenu, ObjectRef, CONTEXT_ROUTE, GET_OBJECT_ROUTE, POST_OBJECT_ROUTE, WAKE_ROUTE,
    },
};
use thiserror::Error;
use tracing::{debug, warn};
use url::Url;

pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("invalid server url `{url}`: {source}")]
    InvalidUrl {
        url: String,
        source: url::ParseError,
    },
    #[error("request to {route} failed: {source}")]
    Transport {
        route: &'static str,
        source: reqwest::Error,
    },
    #[error("{route} returned HTTP {status}: {body}")]
    Status {
        route: &'static str,
        status: u16,
        body: String,
    },
    #[error("malformed response from {route}: {source}")]
    Decode {
        route: &'static str,
        source: reqwest::Error,
    },
    #[error("inventory gateway is unavailable")]
    Unavailable,
}

impl GatewayError {
    pub fn api_error(&self) -> ApiError {
        let code = match self {
            GatewayError::Status { status, .. } => ErrorCode::from_status(*status),
            GatewayError::Decode { .. } | GatewayError::InvalidUrl { .. } => ErrorCode::Validation,
            GatewayError::Transport { .. } | GatewayError::Unavailable => ErrorCode::Unavailable,
        };
        ApiError::new(code, self.to_string())
    }
}

/// Outbound calls the console makes against the inventory service.
#[async_trait]
pub trait InventoryGateway: Send + Sync {
    async fn get_object(&self, objuuid: &ObjUuid) -> Result<HostRecord, GatewayError>;
    async fn wake(&self, objuuid: &ObjUuid) -> Result<(), GatewayError>;
    async fn context_menu(&self, objuuid: &ObjUuid) -> Result<ContextMenu, GatewayError>;
    async fn post_object(&self, record: &HostRecord) -> Result<HostRecord, GatewayError>;
}

/// Stand-in used when no server is configured; every call fails.
pub struct MissingInventoryGateway;

#[async_trait]
impl InventoryGateway for MissingInventoryGateway {
    async fn get_object(&self, _objuuid: &ObjUuid) -> Result<HostRecord, GatewayError> {
        Err(GatewayError::Unavailable)
    }

    async fn wake(&self, _objuuid: &ObjUuid) -> Result<(), GatewayError> {
        Err(GatewayError::Unavailable)
    }

    async fn context_menu(&self, _objuuid: &ObjUuid) -> Result<ContextMenu, GatewayError> {
        Err(GatewayError::Unavailable)
    }

    async fn post_object(&self, _record: &HostRecord) -> Result<HostRecord, GatewayError> {
        Err(GatewayError::Unavailable)
    }
}

pub struct InventoryClient {
    http: Client,
    base_url: Url,
    timeout: Duration,
}

impl InventoryClient {
    pub fn new(server_url: &str) -> Result<Self, GatewayError> {
        Self::with_timeout(server_url, DEFAULT_REQUEST_TIMEOUT)
    }

    pub fn with_timeout(server_url: &str, timeout: Duration) -> Result<Self, GatewayError> {
        // Routes are relative; without a trailing slash `join` would drop the last path segment.
        let normalized = if server_url.ends_with('/') {
            server_url.to_string()
        } else {
            format!("{server_url}/")
        };
        let base_url = Url::parse(&normalized).map_err(|source| GatewayError::InvalidUrl {
            url: server_url.to_string(),
            source,
        })?;
        Ok(Self {
            http: Client::new(),
            base_url,
            timeout,
        })
    }

    fn endpoint(&self, route: &'static str) -> Result<Url, GatewayError> {
        self.base_url
            .join(route)
            .map_err(|source| GatewayError::InvalidUrl {
                url: format!("{}{route}", self.base_url),
                source,
            })
    }

    fn post(&self, route: &'static str) -> Result<RequestBuilder, GatewayError> {
        Ok(self.http.post(self.endpoint(route)?).timeout(self.timeout))
    }

    async fn send(
        &self,
        route: &'static str,
        request: RequestBuilder,
    ) -> Result<reqwest::Response, GatewayError> {
        let res = request
            .send()
            .await
            .map_err(|source| GatewayError::Transport { route, source })?;
        let status = res.status();
        if !status.is_success() {
            let body = res.text().await.unwrap_or_default();
            warn!(route, status = status.as_u16(), "inventory call rejected");
            return Err(GatewayError::Status {
                route,
                status: status.as_u16(),
                body,
            });
        }
        Ok(res)
    }

    async fn send_json<T: DeserializeOwned>(
        &self,
        route: &'static str,
        request: RequestBuilder,
    ) -> Result<T, GatewayError> {
        self.send(route, request)
            .await?
            .json::<T>()
            .await
            .map_err(|source| GatewayError::Decode { route, source })
    }

    fn object_form(objuuid: &ObjUuid) -> ObjectRef {
        ObjectRef {
            objuuid: objuuid.clone(),
        }
    }
}

#[async_trait]
impl InventoryGateway for InventoryClient {
    async fn get_object(&self, objuuid: &ObjUuid) -> Result<HostRecord, GatewayError> {
        debug!(%objuuid, "fetching inventory object");
        let request = self
            .post(GET_OBJECT_ROUTE)?
            .form(&Self::object_form(objuuid));
        self.send_json(GET_OBJECT_ROUTE, request).await
    }

    async fn wake(&self, objuuid: &ObjUuid) -> Result<(), GatewayError> {
        debug!(%objuuid, "sending wake");
        let request = self.post(WAKE_ROUTE)?.form(&Self::object_form(objuuid));
        // Response body carries nothing the console uses.
        let res = self.send(WAKE_ROUTE, request).await?;
        let _ = res.bytes().await;
        Ok(())
    }

    async fn context_menu(&self, objuuid: &ObjUuid) -> Result<ContextMenu, GatewayError> {
        let request = self.post(CONTEXT_ROUTE)?.form(&Self::object_form(objuuid));
        self.send_json(CONTEXT_ROUTE, request).await
    }

    async fn post_object(&self, record: &HostRecord) -> Result<HostRecord, GatewayError> {
        debug!(objuuid = %record.objuuid, "posting inventory object");
        let request = self.post(POST_OBJECT_ROUTE)?.json(record);
        self.send_json(POST_OBJECT_ROUTE, request).await
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
