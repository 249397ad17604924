use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};

/// Configuration for the InsureScan analysis relay
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Provider credentials and limits
    pub providers: ProvidersConfig,

    /// Analysis pipeline settings
    pub analysis: AnalysisConfig,

    /// HTTP server settings
    pub server: ServerConfig,
}

/// One section per external analyst backend, in fallback priority order
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProvidersConfig {
    pub openrouter: ProviderSettings,
    pub gemini: ProviderSettings,
    pub bytez: ProviderSettings,
}

/// Settings shared by every provider adapter
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderSettings {
    /// Bearer/API credential; absence disables the provider
    pub api_key: Option<String>,

    /// Endpoint URL; `{model}` is substituted where the provider embeds
    /// the model name in the path
    pub endpoint: String,

    /// Candidate models tried in order; rotation advances on failure
    pub models: Vec<String>,

    /// Input length above which smart extraction kicks in
    pub large_doc_threshold: usize,

    /// Character budget handed to smart extraction
    pub extract_budget: usize,

    /// Hard ceiling on characters submitted to the provider
    pub submit_ceiling: usize,

    /// Request timeout in seconds
    pub timeout_seconds: u64,

    /// Generation temperature
    pub temperature: f32,

    /// Maximum tokens to generate
    pub max_tokens: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// Minimum usable input length; shorter text is rejected before analysis
    pub min_text_length: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Port for the HTTP API
    pub port: u16,
}

impl ProviderSettings {
    /// A provider with no credential is disabled, not broken
    pub fn is_configured(&self) -> bool {
        self.api_key.as_deref().is_some_and(|key| !key.trim().is_empty())
    }
}

impl Config {
    /// Load configuration from file, falling back to defaults, then apply
    /// environment overrides
    pub fn load() -> Self {
        let config_paths = ["insurescan.toml", "config/insurescan.toml"];

        let mut config = Self::default();
        for path in &config_paths {
            if let Ok(config_str) = std::fs::read_to_string(path) {
                match toml::from_str(&config_str) {
                    Ok(parsed) => {
                        tracing::info!("📄 Loaded configuration from: {}", path);
                        config = parsed;
                        break;
                    }
                    Err(e) => {
                        tracing::warn!("Failed to parse config file {}: {}", path, e);
                    }
                }
            }
        }

        config.apply_env();
        config
    }

    /// Credentials and the server port come from the environment when set
    pub fn apply_env(&mut self) {
        if let Ok(key) = std::env::var("OPENROUTER_API_KEY") {
            self.providers.openrouter.api_key = Some(key.trim().to_string());
        }
        if let Ok(key) = std::env::var("GOOGLE_API_KEY") {
            self.providers.gemini.api_key = Some(key.trim().to_string());
        }
        if let Ok(key) = std::env::var("BYTEZ_API_KEY") {
            self.providers.bytez.api_key = Some(key.trim().to_string());
        }
        if let Ok(port) = std::env::var("INSURESCAN_PORT") {
            if let Ok(port) = port.parse() {
                self.server.port = port;
            }
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        for (name, settings) in [
            ("openrouter", &self.providers.openrouter),
            ("gemini", &self.providers.gemini),
            ("bytez", &self.providers.bytez),
        ] {
            if settings.models.is_empty() {
                return Err(anyhow!("provider {} has no candidate models", name));
            }
            if settings.submit_ceiling == 0 {
                return Err(anyhow!("provider {} submit_ceiling must be greater than 0", name));
            }
            if settings.extract_budget == 0 {
                return Err(anyhow!("provider {} extract_budget must be greater than 0", name));
            }
            if settings.timeout_seconds == 0 {
                return Err(anyhow!("provider {} timeout must be greater than 0", name));
            }
        }

        if self.analysis.min_text_length == 0 {
            return Err(anyhow!("min_text_length must be greater than 0"));
        }

        Ok(())
    }

    /// Runtime configuration summary; never prints credentials
    pub fn summary(&self) -> String {
        let enabled = |s: &ProviderSettings| if s.is_configured() { "enabled" } else { "disabled" };
        format!(
            "InsureScan Configuration:\n\
            - OpenRouter: {} ({} candidate models)\n\
            - Gemini: {}\n\
            - Bytez: {}\n\
            - Minimum input length: {}\n\
            - Server port: {}",
            enabled(&self.providers.openrouter),
            self.providers.openrouter.models.len(),
            enabled(&self.providers.gemini),
            enabled(&self.providers.bytez),
            self.analysis.min_text_length,
            self.server.port,
        )
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            providers: ProvidersConfig {
                openrouter: ProviderSettings {
                    api_key: None,
                    endpoint: "https://openrouter.ai/api/v1/chat/completions".to_string(),
                    models: vec![
                        "google/gemini-2.0-flash-exp:free".to_string(),
                        "meta-llama/llama-3.3-70b-instruct:free".to_string(),
                        "deepseek/deepseek-r1:free".to_string(),
                        "qwen/qwen3-14b:free".to_string(),
                        "mistralai/mistral-small-3.1-24b-instruct:free".to_string(),
                    ],
                    large_doc_threshold: 10_000,
                    extract_budget: 12_000,
                    submit_ceiling: 12_000,
                    timeout_seconds: 60,
                    temperature: 0.3,
                    max_tokens: 1500,
                },
                gemini: ProviderSettings {
                    api_key: None,
                    endpoint:
                        "https://generativelanguage.googleapis.com/v1beta/models/{model}:generateContent"
                            .to_string(),
                    models: vec!["gemini-2.0-flash-lite".to_string()],
                    large_doc_threshold: 10_000,
                    extract_budget: 12_000,
                    submit_ceiling: 15_000,
                    timeout_seconds: 60,
                    temperature: 0.3,
                    max_tokens: 4096,
                },
                bytez: ProviderSettings {
                    api_key: None,
                    endpoint: "https://api.bytez.com/models/v2/{model}".to_string(),
                    models: vec!["Qwen/Qwen3-4B".to_string()],
                    large_doc_threshold: 8_000,
                    extract_budget: 10_000,
                    submit_ceiling: 12_000,
                    timeout_seconds: 60,
                    temperature: 0.3,
                    max_tokens: 4096,
                },
            },
            analysis: AnalysisConfig {
                min_text_length: 50,
            },
            server: ServerConfig { port: 5000 },
        }
    }
}

/// Configuration builder for programmatic config creation
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    pub fn new() -> Self {
        Self {
            config: Config::default(),
        }
    }

    pub fn with_openrouter_key(mut self, api_key: impl Into<String>) -> Self {
        self.config.providers.openrouter.api_key = Some(api_key.into());
        self
    }

    pub fn with_gemini_key(mut self, api_key: impl Into<String>) -> Self {
        self.config.providers.gemini.api_key = Some(api_key.into());
        self
    }

    pub fn with_bytez_key(mut self, api_key: impl Into<String>) -> Self {
        self.config.providers.bytez.api_key = Some(api_key.into());
        self
    }

    pub fn with_min_text_length(mut self, min_text_length: usize) -> Self {
        self.config.analysis.min_text_length = min_text_length;
        self
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.config.server.port = port;
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
