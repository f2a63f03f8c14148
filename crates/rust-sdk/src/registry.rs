/// Shared cache of clients keyed by server URL
use crate::client::JobServerClient;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use jobserver_sdk_core::{normalize_base_url, ClientConfig, ClientResult};
use tracing::debug;

/// Hands out one [`JobServerClient`] per job server.
///
/// URLs that normalize to the same base (surrounding whitespace, a missing
/// trailing slash) share a client. New clients take their timeouts from the
/// template configuration.
#[derive(Debug)]
pub struct ClientRegistry {
    template: ClientConfig,
    clients: DashMap<String, JobServerClient>,
}

impl ClientRegistry {
    pub fn new(template: ClientConfig) -> Self {
        Self {
            template,
            clients: DashMap::new(),
        }
    }

    /// Return the client for `url`, creating it on first use.
    ///
    /// Concurrent first calls for the same URL observe the same client.
    pub fn get_or_create(&self, url: &str) -> ClientResult<JobServerClient> {
        let key = normalize_base_url(url)?.to_string();

        if let Some(client) = self.clients.get(&key) {
            return Ok(client.clone());
        }

        let client = match self.clients.entry(key) {
            Entry::Occupied(entry) => entry.get().clone(),
            Entry::Vacant(entry) => {
                let client = JobServerClient::with_config(self.config_for(entry.key()))?;
                debug!("Registered job server client for {}", entry.key());
                entry.insert(client).clone()
            }
        };
        Ok(client)
    }

    // Template timeouts with the server's own base URL
    fn config_for(&self, base_url: &str) -> ClientConfig {
        ClientConfig {
            base_url: base_url.to_string(),
            ..self.template.clone()
        }
    }

    /// Number of distinct servers with a client
    pub fn len(&self) -> usize {
        self.clients.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clients.is_empty()
    }
}
