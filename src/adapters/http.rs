use crate::utils::error::Result;
use reqwest::Client;
use std::time::Duration;

pub const DEFAULT_USER_AGENT: &str = concat!("cep-route/", env!("CARGO_PKG_VERSION"));

/// Shared client for the lookup services. The timeout covers the whole call,
/// so a slow service is reported like any other failed request.
pub fn build_client(timeout: Duration, user_agent: &str) -> Result<Client> {
    let client = Client::builder()
        .timeout(timeout)
        .user_agent(user_agent)
        .build()?;
    Ok(client)
}

pub(crate) fn join_url(base: &str, path: &str) -> String {
    format!("{}/{}", base.trim_end_matches('/'), path.trim_start_matches('/'))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_join_url() {
        assert_eq!(
            join_url("https://viacep.com.br/", "/ws/01001000/json/"),
            "https://viacep.com.br/ws/01001000/json/"
        );
        assert_eq!(
            join_url("http://127.0.0.1:8080", "search"),
            "http://127.0.0.1:8080/search"
        );
    }

    #[test]
    fn test_build_client() {
        assert!(build_client(Duration::from_secs(15), DEFAULT_USER_AGENT).is_ok());
    }
}
