//! Toolkit instance
//!
//! A `Toolkit` bundles the caller's configuration with the shared
//! collaborators the components need: the token generator behind upload
//! renaming and the HTTP client behind remote pushes. Both are replaceable
//! through builder methods, so tests can inject a seeded generator or a
//! client pointed at a double.

use std::time::Duration;

use anyhow::Context;
use toolbelt_core::{TokenGenerator, ToolkitConfig};

const HTTP_TIMEOUT_SECS: u64 = 30;

pub struct Toolkit {
    pub(crate) config: ToolkitConfig,
    pub(crate) tokens: TokenGenerator,
    pub(crate) http_client: reqwest::Client,
}

impl Toolkit {
    /// Build a toolkit with a clock-seeded token generator and a default
    /// HTTP client.
    pub fn new(config: ToolkitConfig) -> anyhow::Result<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(HTTP_TIMEOUT_SECS))
            .build()
            .context("failed to build HTTP client")?;

        Ok(Self {
            config,
            tokens: TokenGenerator::new(),
            http_client,
        })
    }

    /// Replace the HTTP client used by [`Toolkit::push_json`].
    pub fn with_http_client(mut self, client: reqwest::Client) -> Self {
        self.http_client = client;
        self
    }

    /// Replace the token generator used for upload renaming.
    pub fn with_token_generator(mut self, tokens: TokenGenerator) -> Self {
        self.tokens = tokens;
        self
    }

    pub fn config(&self) -> &ToolkitConfig {
        &self.config
    }

    /// See [`TokenGenerator::random_string`].
    pub fn random_string(&self, n: usize) -> String {
        self.tokens.random_string(n)
    }
}
