use crate::api::api_types::{ApiApprovalRequest, ApiTransactionsPage};
use crate::api::transport::{Transport, TransportError};
use crate::api::types::{Cursor, Employee, PaginatedResult, Transaction};
use crate::config::{ApiConfig, Config};
use async_trait::async_trait;
use color_eyre::{eyre::eyre, Result};
use serde::de::DeserializeOwned;
use std::time::Duration;
use url::Url;

/// HTTP implementation of [`Transport`]
#[derive(Clone)]
pub struct HttpTransport {
  client: reqwest::Client,
  base: Url,
  token: Option<String>,
}

impl HttpTransport {
  pub fn new(config: &ApiConfig) -> Result<Self> {
    let url = config
      .url
      .as_deref()
      .ok_or_else(|| eyre!("No api.url configured. Set it in the config file or run with --demo."))?;

    let base = Url::parse(url).map_err(|e| eyre!("Invalid api.url {}: {}", url, e))?;
    if base.cannot_be_a_base() {
      return Err(eyre!("api.url {} cannot be used as a base URL", url));
    }

    let client = reqwest::Client::builder()
      .timeout(Duration::from_secs(config.timeout_secs))
      .build()
      .map_err(|e| eyre!("Failed to create HTTP client: {}", e))?;

    Ok(Self {
      client,
      base,
      token: Config::get_api_token(),
    })
  }

  /// Append path segments to the base URL
  fn endpoint(&self, segments: &[&str]) -> Url {
    let mut url = self.base.clone();
    // cannot_be_a_base was rejected in new(), so segments are always available
    if let Ok(mut path) = url.path_segments_mut() {
      path.pop_if_empty().extend(segments);
    }
    url
  }

  fn authorize(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
    match &self.token {
      Some(token) => request.bearer_auth(token),
      None => request,
    }
  }

  async fn send(&self, request: reqwest::RequestBuilder) -> Result<reqwest::Response, TransportError> {
    let response = self
      .authorize(request)
      .send()
      .await
      .map_err(|e| TransportError::Request(e.to_string()))?;

    let status = response.status();
    if !status.is_success() {
      let message = response.text().await.unwrap_or_default();
      return Err(TransportError::Status {
        status: status.as_u16(),
        message,
      });
    }

    Ok(response)
  }

  async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, TransportError> {
    tracing::debug!(%url, "GET");
    let response = self.send(self.client.get(url)).await?;
    response
      .json::<T>()
      .await
      .map_err(|e| TransportError::Decode(e.to_string()))
  }
}

#[async_trait]
impl Transport for HttpTransport {
  async fn get_employees(&self) -> Result<Vec<Employee>, TransportError> {
    self.get_json(self.endpoint(&["employees"])).await
  }

  async fn get_transactions_page(
    &self,
    cursor: Option<Cursor>,
  ) -> Result<PaginatedResult<Transaction>, TransportError> {
    let mut url = self.endpoint(&["transactions"]);
    if let Some(cursor) = cursor {
      url.query_pairs_mut().append_pair("page", cursor.as_str());
    }
    let page: ApiTransactionsPage = self.get_json(url).await?;
    Ok(page.into())
  }

  async fn get_transactions_by_employee(
    &self,
    employee_id: &str,
  ) -> Result<Vec<Transaction>, TransportError> {
    self
      .get_json(self.endpoint(&["employees", employee_id, "transactions"]))
      .await
  }

  async fn set_transaction_approval(
    &self,
    transaction_id: &str,
    value: bool,
  ) -> Result<(), TransportError> {
    let url = self.endpoint(&["transactions", transaction_id, "approval"]);
    tracing::debug!(%url, value, "POST");
    self
      .send(self.client.post(url).json(&ApiApprovalRequest { value }))
      .await?;
    Ok(())
  }
}
