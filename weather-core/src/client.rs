use crate::{
    Config, LookupError, LookupResult, WeatherRequest, client::http::HttpLookupClient,
};
use async_trait::async_trait;
use std::fmt::Debug;

pub mod http;

/// Seam between the lookup form and the weather service.
#[async_trait]
pub trait LookupClient: Send + Sync + Debug {
    /// `GET /weather/{identifier}`.
    async fn fetch(&self, identifier: &str) -> Result<LookupResult, LookupError>;

    /// `POST /weather`; returns the identifier of the stored record.
    async fn create(&self, request: &WeatherRequest) -> Result<String, LookupError>;
}

/// Construct the HTTP client for the configured service.
pub fn client_from_config(config: &Config) -> Box<dyn LookupClient> {
    Box::new(HttpLookupClient::new(config.base_url()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_from_config_uses_base_url() {
        let mut cfg = Config::default();
        cfg.set_base_url("http://weather.internal:9000/").unwrap();

        let client = client_from_config(&cfg);
        assert!(format!("{client:?}").contains("http://weather.internal:9000"));
    }
}
