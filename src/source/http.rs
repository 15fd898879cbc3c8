//! HTTP data source.
//!
//! Fetches the three dashboard resources from a base URL. The fetches run
//! concurrently in a background task; if any of the three fails (including
//! by timeout) the whole round is discarded and the error recorded, never
//! a partial bundle.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use reqwest::Client;
use serde::de::DeserializeOwned;
use tokio::sync::mpsc;
use tracing::debug;

use super::bundle::{ALERTS_RESOURCE, CATALOG_RESOURCE, RELATIONSHIPS_RESOURCE};
use super::error::LoadError;
use super::{Alert, DataBundle, DataSource, KpiCatalog, RelationshipGraph};

/// A data source that periodically fetches the resources over HTTP.
///
/// `spawn` starts a background tokio task that requests
/// `<base>/kpi_data.json`, `<base>/kpi_relationships.json` and
/// `<base>/alerts.json` together on every refresh tick and hands complete
/// bundles to the TUI via `poll()`.
///
/// Must be created inside a tokio runtime.
///
/// # Example
///
/// ```no_run
/// use std::time::Duration;
/// use wardwatch::HttpSource;
///
/// # tokio_test::block_on(async {
/// let source = HttpSource::spawn(
///     "http://dashboard.example.org/api",
///     Duration::from_secs(5),
///     Duration::from_secs(10),
/// );
/// # });
/// ```
#[derive(Debug)]
pub struct HttpSource {
    receiver: mpsc::Receiver<DataBundle>,
    description: String,
    last_error: Arc<Mutex<Option<String>>>,
}

impl HttpSource {
    /// Spawn the background fetch task.
    ///
    /// * `base_url` - base URL the three resource paths are joined onto
    /// * `refresh` - interval between fetch rounds
    /// * `timeout` - per-request timeout; a timed-out request fails the
    ///   whole round
    pub fn spawn(base_url: &str, refresh: Duration, timeout: Duration) -> Self {
        let (tx, rx) = mpsc::channel(16);
        let last_error = Arc::new(Mutex::new(None));
        let error_handle = last_error.clone();
        let base = base_url.trim_end_matches('/').to_string();
        let description = format!("http: {}", base);
        // tokio::time::interval panics on a zero period
        let refresh = refresh.max(Duration::from_millis(100));

        tokio::spawn(async move {
            let client = match Client::builder().timeout(timeout).build() {
                Ok(client) => client,
                Err(e) => {
                    *error_handle.lock().unwrap() = Some(format!("HTTP client error: {}", e));
                    return;
                }
            };

            let mut interval = tokio::time::interval(refresh);
            loop {
                interval.tick().await;
                match fetch_bundle(&client, &base).await {
                    Ok(bundle) => {
                        *error_handle.lock().unwrap() = None;
                        debug!(base = %base, "fetched dashboard bundle");
                        if tx.send(bundle).await.is_err() {
                            // Receiver dropped
                            break;
                        }
                    }
                    Err(e) => {
                        *error_handle.lock().unwrap() = Some(e.to_string());
                    }
                }
            }
        });

        Self {
            receiver: rx,
            description,
            last_error,
        }
    }
}

/// Fetch the three resources concurrently; any failure fails the round.
async fn fetch_bundle(client: &Client, base: &str) -> Result<DataBundle, LoadError> {
    let (catalog, relationships, alerts) = tokio::try_join!(
        fetch_resource::<KpiCatalog>(client, base, CATALOG_RESOURCE),
        fetch_resource::<RelationshipGraph>(client, base, RELATIONSHIPS_RESOURCE),
        fetch_resource::<Vec<Alert>>(client, base, ALERTS_RESOURCE),
    )?;

    Ok(DataBundle {
        catalog,
        relationships,
        alerts,
    })
}

async fn fetch_resource<T: DeserializeOwned>(
    client: &Client,
    base: &str,
    resource: &'static str,
) -> Result<T, LoadError> {
    let url = format!("{}/{}", base, resource);
    let response = client.get(&url).send().await?;

    if !response.status().is_success() {
        return Err(LoadError::Http(format!(
            "{} returned status {}",
            resource,
            response.status()
        )));
    }

    response
        .json()
        .await
        .map_err(|e| LoadError::Parse(resource, e.to_string()))
}

impl DataSource for HttpSource {
    fn poll(&mut self) -> Option<DataBundle> {
        match self.receiver.try_recv() {
            Ok(bundle) => Some(bundle),
            Err(mpsc::error::TryRecvError::Empty) => None,
            Err(mpsc::error::TryRecvError::Disconnected) => {
                *self.last_error.lock().unwrap() = Some("Fetch task stopped".to_string());
                None
            }
        }
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn error(&self) -> Option<String> {
        self.last_error.lock().unwrap().clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_http_source_description_strips_trailing_slash() {
        let source = HttpSource::spawn(
            "http://localhost:8080/",
            Duration::from_secs(60),
            Duration::from_secs(1),
        );
        assert_eq!(source.description(), "http: http://localhost:8080");
    }

    #[tokio::test]
    async fn test_http_source_unreachable_records_error() {
        // Port 1 is never listening; connection is refused immediately
        let mut source = HttpSource::spawn(
            "http://127.0.0.1:1",
            Duration::from_millis(50),
            Duration::from_secs(1),
        );

        tokio::time::sleep(Duration::from_millis(200)).await;

        assert!(source.poll().is_none());
        assert!(source.error().is_some());
    }
}
