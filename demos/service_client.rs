//! Microservice client example
//!
//! A client whose first handshake fails: the connection manager logs the
//! failure, rebuilds the client and hands out a working one.
//!
//! Run with: cargo run --example service_client

use async_trait::async_trait;
use rust_service_logger::connection::{
    BoxError, ClientFactory, ConnectionError, MicroserviceClient, ServiceClient, TransportConfig,
};
use rust_service_logger::{ExcludedLevelSet, Logger};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

struct QueueClient {
    generation: usize,
    address: String,
}

#[async_trait]
impl ServiceClient for QueueClient {
    async fn connect(&self) -> Result<(), BoxError> {
        if self.generation == 0 {
            return Err(format!("{} refused the connection", self.address).into());
        }
        Ok(())
    }
}

struct NotificationsFactory {
    builds: Arc<AtomicUsize>,
}

#[async_trait]
impl ClientFactory for NotificationsFactory {
    type Client = QueueClient;

    fn service_name(&self) -> &str {
        "notifications"
    }

    fn app_name(&self) -> &str {
        "storefront"
    }

    async fn build_client(&self, transport: &TransportConfig) -> Result<QueueClient, BoxError> {
        Ok(QueueClient {
            generation: self.builds.fetch_add(1, Ordering::SeqCst),
            address: transport.address(),
        })
    }
}

#[tokio::main]
async fn main() -> Result<(), ConnectionError> {
    println!("=== Rust Service Logger - Microservice Client Example ===\n");

    let logger = Logger::builder()
        .context("storefront")
        .excluded_levels(ExcludedLevelSet::new())
        .build();

    let builds = Arc::new(AtomicUsize::new(0));
    let notifications = MicroserviceClient::from_env(
        NotificationsFactory {
            builds: Arc::clone(&builds),
        },
        &logger,
    );

    let client = notifications.get_client().await?;
    println!(
        "\nGot client generation {} after {} builds",
        client.generation,
        builds.load(Ordering::SeqCst)
    );

    let again = notifications.get_client().await?;
    println!("Second call reused the client: {}", Arc::ptr_eq(&client, &again));

    println!("\n=== Example completed successfully! ===");
    Ok(())
}
