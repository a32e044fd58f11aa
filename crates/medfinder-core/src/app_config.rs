#[derive(Clone)]
pub struct AppConfig {
    /// Base URL of the primary reverse-geocoding endpoint.
    pub geocoder_base_url: String,
    /// Optional second reverse-geocoding endpoint, tried when the primary
    /// attempt fails. Deployment-specific; absent in most environments.
    pub geocoder_fallback_url: Option<String>,
    /// API key for the fallback endpoint, sent as a `key` query parameter.
    pub geocoder_fallback_api_key: Option<String>,
    pub geocoder_timeout_secs: u64,
    /// Descriptive client identifier sent as the `User-Agent` header.
    pub user_agent: String,
    /// Timeout handed to the device location provider. Must stay at or above
    /// 15 seconds: a fresh high-accuracy fix matters more than speed here.
    pub device_timeout_secs: u64,
    pub max_retry_attempts: u32,
    pub retry_base_delay_ms: u64,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("geocoder_base_url", &self.geocoder_base_url)
            .field("geocoder_fallback_url", &self.geocoder_fallback_url)
            .field(
                "geocoder_fallback_api_key",
                &self.geocoder_fallback_api_key.as_ref().map(|_| "[redacted]"),
            )
            .field("geocoder_timeout_secs", &self.geocoder_timeout_secs)
            .field("user_agent", &self.user_agent)
            .field("device_timeout_secs", &self.device_timeout_secs)
            .field("max_retry_attempts", &self.max_retry_attempts)
            .field("retry_base_delay_ms", &self.retry_base_delay_ms)
            .finish()
    }
}
