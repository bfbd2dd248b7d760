use zpass_types::NetworkId;

/// Default explorer endpoint used when no host override is given.
pub const DEFAULT_HOST: &str = "https://api.explorer.provable.com/v1";

/// Required prefix of the bech32 private key encoding.
pub const PRIVATE_KEY_PREFIX: &str = "APrivateKey1";

/// Default bound on cached proving/verifying key pairs.
pub const DEFAULT_KEY_CACHE_CAPACITY: usize = 16;

/// Construction parameters for the SDK.
#[derive(Clone, Debug)]
pub struct SdkOptions {
    pub private_key: String,
    pub host: Option<String>,
    pub network: NetworkId,
    /// Bound on cached key pairs; least-recently-used entries are evicted.
    pub key_cache_capacity: usize,
}

impl SdkOptions {
    pub fn new(private_key: impl Into<String>) -> Self {
        Self {
            private_key: private_key.into(),
            host: None,
            network: NetworkId::default(),
            key_cache_capacity: DEFAULT_KEY_CACHE_CAPACITY,
        }
    }

    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = Some(host.into());
        self
    }

    pub fn with_network(mut self, network: NetworkId) -> Self {
        self.network = network;
        self
    }
}
