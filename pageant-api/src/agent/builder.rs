use super::config::Config;
use super::PageantAgent;
use crate::gateway::GatewayHooks;
use pageant_common::store::memory::MemoryStore;
use pageant_common::store::Store;
use pageant_http::HttpClient;
#[cfg(feature = "default-client")]
use pageant_http_client::reqwest::ReqwestClient;

/// A builder for creating a [`PageantAgent`].
pub struct AgentBuilder<T, S = MemoryStore<String, String>>
where
    T: HttpClient + Send + Sync,
    S: Store<String, String> + Send + Sync,
{
    config: Config,
    store: S,
    client: T,
    hooks: GatewayHooks,
}

impl<T> AgentBuilder<T>
where
    T: HttpClient + Send + Sync,
{
    /// Create a new builder with the given HTTP client.
    pub fn new(client: T) -> Self {
        Self {
            config: Config::default(),
            store: MemoryStore::default(),
            client,
            hooks: GatewayHooks::default(),
        }
    }
}

impl<T, S> AgentBuilder<T, S>
where
    T: HttpClient + Send + Sync,
    S: Store<String, String> + Send + Sync,
    S::Error: Send + Sync + 'static,
{
    /// Set the configuration for the agent.
    pub fn config(mut self, config: Config) -> Self {
        self.config = config;
        self
    }
    /// Set the session store for the agent.
    ///
    /// Returns a new builder with the session store set.
    pub fn store<S0>(self, store: S0) -> AgentBuilder<T, S0>
    where
        S0: Store<String, String> + Send + Sync,
    {
        AgentBuilder { config: self.config, store, client: self.client, hooks: self.hooks }
    }
    /// Set the HTTP client for the agent.
    ///
    /// Returns a new builder with the HTTP client set.
    pub fn client<T0>(self, client: T0) -> AgentBuilder<T0, S>
    where
        T0: HttpClient + Send + Sync,
    {
        AgentBuilder { config: self.config, store: self.store, client, hooks: self.hooks }
    }
    /// Set the hooks every token refresh reports to.
    pub fn hooks(mut self, hooks: GatewayHooks) -> Self {
        self.hooks = hooks;
        self
    }
    pub fn build(self) -> PageantAgent<S, T> {
        PageantAgent::new(self.client, self.store, self.config, self.hooks)
    }
}

#[cfg_attr(docsrs, doc(cfg(feature = "default-client")))]
#[cfg(feature = "default-client")]
impl Default for AgentBuilder<ReqwestClient, MemoryStore<String, String>> {
    /// Create a new builder with the default client and session store.
    ///
    /// Default client is [`ReqwestClient`] and default session store is [`MemoryStore`].
    fn default() -> Self {
        Self::new(ReqwestClient::new(Config::default().endpoint))
    }
}
