//! Base for microservice client wrappers

use super::error::ConnectionError;
use super::manager::{ClientFactory, ConnectionManager, ConnectionState};
use super::transport::{RetryPolicy, TransportConfig};
use crate::core::Logger;
use std::sync::Arc;

/// A service's client proxy: the factory says how to build the client, the
/// wrapper keeps it alive.
///
/// # Example
///
/// ```no_run
/// # use async_trait::async_trait;
/// # use rust_service_logger::connection::*;
/// # use rust_service_logger::Logger;
/// # struct QueueClient;
/// # #[async_trait]
/// # impl ServiceClient for QueueClient {
/// #     async fn connect(&self) -> Result<(), BoxError> { Ok(()) }
/// # }
/// # struct Billing;
/// # #[async_trait]
/// # impl ClientFactory for Billing {
/// #     type Client = QueueClient;
/// #     fn service_name(&self) -> &str { "billing" }
/// #     fn app_name(&self) -> &str { "storefront" }
/// #     async fn build_client(&self, _: &TransportConfig) -> Result<QueueClient, BoxError> { Ok(QueueClient) }
/// # }
/// # async fn run() -> Result<(), ConnectionError> {
/// let billing = MicroserviceClient::from_env(Billing, &Logger::new("storefront"));
/// let client = billing.get_client().await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct MicroserviceClient<F: ClientFactory> {
    connection: ConnectionManager<F>,
}

impl<F: ClientFactory> MicroserviceClient<F> {
    pub fn new(factory: F, transport: TransportConfig, logger: &Logger) -> Self {
        Self {
            connection: ConnectionManager::new(factory, transport, logger),
        }
    }

    /// Transport read from `<SERVICE>_HOST` / `<SERVICE>_PORT`, where
    /// `<SERVICE>` is the upper-cased service name.
    pub fn from_env(factory: F, logger: &Logger) -> Self {
        let transport = TransportConfig::from_env(&env_prefix(factory.service_name()));
        Self::new(factory, transport, logger)
    }

    #[must_use]
    pub fn with_retry_policy(self, retry: RetryPolicy) -> Self {
        Self {
            connection: self.connection.with_retry_policy(retry),
        }
    }

    pub async fn get_client(&self) -> Result<Arc<F::Client>, ConnectionError> {
        self.connection.acquire().await
    }

    pub fn service_name(&self) -> &str {
        self.connection.service_name()
    }

    pub fn app_name(&self) -> &str {
        self.connection.app_name()
    }

    pub async fn state(&self) -> ConnectionState {
        self.connection.state().await
    }

    pub fn connection(&self) -> &ConnectionManager<F> {
        &self.connection
    }
}

fn env_prefix(service_name: &str) -> String {
    service_name
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() {
                c.to_ascii_uppercase()
            } else {
                '_'
            }
        })
        .collect()
}
