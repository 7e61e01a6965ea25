use crate::adapters::http::join_url;
use crate::domain::model::Cep;
use crate::domain::ports::AddressResolver;
use crate::utils::error::LookupError;
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

pub const DEFAULT_VIACEP_URL: &str = "https://viacep.com.br";

#[derive(Debug, Deserialize)]
struct ViaCepResponse {
    #[serde(default)]
    logradouro: Option<String>,
    #[serde(default)]
    bairro: Option<String>,
    #[serde(default)]
    localidade: Option<String>,
    #[serde(default)]
    uf: Option<String>,
    #[serde(default)]
    erro: Option<serde_json::Value>,
}

impl ViaCepResponse {
    // ViaCEP 以 {"erro": true} 或 {"erro": "true"} 表示查無資料
    fn is_not_found(&self) -> bool {
        match &self.erro {
            Some(serde_json::Value::Bool(flag)) => *flag,
            Some(serde_json::Value::String(flag)) => flag.eq_ignore_ascii_case("true"),
            _ => false,
        }
    }

    fn address(&self) -> String {
        format_address(&[
            self.logradouro.as_deref(),
            self.bairro.as_deref(),
            self.localidade.as_deref(),
            self.uf.as_deref(),
        ])
    }
}

/// Joins the non-empty components with `", "`.
pub fn format_address(parts: &[Option<&str>]) -> String {
    parts
        .iter()
        .filter_map(|part| part.map(str::trim))
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(", ")
}

pub struct ViaCepResolver {
    client: Client,
    base_url: String,
}

impl ViaCepResolver {
    pub fn new(client: Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }

    /// Looks up a digit string. Anything that is not exactly 8 ASCII digits
    /// is rejected before a request is made.
    pub async fn lookup(&self, digits: &str) -> Result<String, LookupError> {
        let cep =
            Cep::from_digits(digits).ok_or_else(|| LookupError::InvalidCep(digits.to_string()))?;

        let url = join_url(&self.base_url, &format!("ws/{}/json/", cep));
        tracing::debug!("Making ViaCEP request to: {}", url);

        let response = self.client.get(&url).send().await?;
        tracing::debug!("ViaCEP response status: {}", response.status());

        if !response.status().is_success() {
            return Err(LookupError::Status(response.status().as_u16()));
        }

        let body = response.text().await?;
        let parsed: ViaCepResponse =
            serde_json::from_str(&body).map_err(|e| LookupError::Malformed(e.to_string()))?;

        if parsed.is_not_found() {
            return Err(LookupError::NotFound(cep.to_string()));
        }

        Ok(parsed.address())
    }
}

#[async_trait]
impl AddressResolver for ViaCepResolver {
    async fn resolve(&self, cep: &Cep) -> Result<String, LookupError> {
        self.lookup(cep.as_str()).await
    }
}
