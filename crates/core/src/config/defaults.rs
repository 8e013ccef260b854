//! Default values and functions for configuration

// Default constants
pub(crate) const DEFAULT_BUDGET: usize = 50;
pub(crate) const DEFAULT_ORACLE_PROVIDER: &str = "openai";
pub(crate) const DEFAULT_ORACLE_MODEL: &str = "gpt-3.5-turbo-0613";
pub(crate) const DEFAULT_ORACLE_API_BASE_URL: &str = "https://api.openai.com/v1";

pub(crate) fn default_budget() -> usize {
    DEFAULT_BUDGET
}

pub(crate) fn default_oracle_provider() -> String {
    DEFAULT_ORACLE_PROVIDER.to_string()
}

pub(crate) fn default_oracle_model() -> String {
    DEFAULT_ORACLE_MODEL.to_string()
}

pub(crate) fn default_oracle_api_base_url() -> String {
    DEFAULT_ORACLE_API_BASE_URL.to_string()
}

pub(crate) fn default_oracle_temperature() -> f32 {
    0.0 // Deterministic judgements
}

pub(crate) fn default_oracle_max_tokens() -> u32 {
    500
}

pub(crate) fn default_oracle_timeout_secs() -> u64 {
    60
}

pub(crate) fn default_max_concurrent_documents() -> usize {
    4
}
