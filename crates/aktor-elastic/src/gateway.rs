//! [`ElasticGateway`] — the Elasticsearch implementation of [`SearchEngine`].

use std::time::Duration;

use aktor_core::{
  actor::Actor,
  engine::SearchEngine,
  query::SearchRequest,
  result::{BulkReport, SearchResult},
  schema::IndexSchema,
};
use reqwest::{Client, RequestBuilder, Response, header};

use crate::{
  Error, Result,
  encode::{
    decode_bulk_response, decode_engine_error, decode_search_response,
    encode_bulk, encode_create_index, encode_search_request,
  },
};

/// Connection settings for the engine.
#[derive(Debug, Clone)]
pub struct ElasticConfig {
  pub base_url: String,
  pub index:    String,
  /// Empty means no authentication.
  pub username: String,
  pub password: String,
  pub timeout:  Duration,
}

/// HTTP client for one index of an Elasticsearch-compatible engine.
///
/// Cheap to clone — the inner [`reqwest::Client`] is `Arc`-based.
#[derive(Clone)]
pub struct ElasticGateway {
  client: Client,
  config: ElasticConfig,
}

impl ElasticGateway {
  pub fn new(config: ElasticConfig) -> Result<Self> {
    let client = Client::builder()
      .timeout(config.timeout)
      .build()
      .map_err(Error::Client)?;
    Ok(Self { client, config })
  }

  pub(crate) fn url(&self, path: &str) -> String {
    format!(
      "{}/{}",
      self.config.base_url.trim_end_matches('/'),
      path.trim_start_matches('/')
    )
  }

  fn auth(&self, req: RequestBuilder) -> RequestBuilder {
    if self.config.username.is_empty() {
      req
    } else {
      req.basic_auth(&self.config.username, Some(&self.config.password))
    }
  }

  /// Pass successful responses through; turn anything else into
  /// [`Error::Engine`] carrying the engine's diagnostic.
  async fn check(resp: Response) -> Result<Response> {
    let status = resp.status();
    if status.is_success() {
      return Ok(resp);
    }
    let body = resp.text().await?;
    Err(Error::Engine {
      status:  status.as_u16(),
      message: decode_engine_error(&body),
    })
  }
}

impl SearchEngine for ElasticGateway {
  type Error = Error;

  async fn create_index(&self, schema: &IndexSchema) -> Result<()> {
    let body = encode_create_index(schema);
    tracing::debug!(index = %self.config.index, %body, "creating index");

    let resp = self
      .auth(self.client.put(self.url(&self.config.index)))
      .json(&body)
      .send()
      .await?;
    Self::check(resp).await?;

    tracing::info!(index = %self.config.index, "index created");
    Ok(())
  }

  async fn bulk_index(&self, actors: &[Actor]) -> Result<BulkReport> {
    if actors.is_empty() {
      return Ok(BulkReport::default());
    }
    let body = encode_bulk(&self.config.index, actors)?;
    tracing::debug!(documents = actors.len(), "submitting bulk request");

    let resp = self
      .auth(self.client.post(self.url("_bulk")))
      .header(header::CONTENT_TYPE, "application/x-ndjson")
      .body(body)
      .send()
      .await?;
    let bytes = Self::check(resp).await?.bytes().await?;
    let report = decode_bulk_response(&bytes)?;

    for failure in &report.failures {
      tracing::warn!(
        id = %failure.id,
        status = failure.status,
        reason = %failure.reason,
        "document rejected"
      );
    }
    tracing::info!(
      indexed = report.indexed,
      failed = report.failures.len(),
      "bulk request done"
    );
    Ok(report)
  }

  async fn search(&self, request: &SearchRequest) -> Result<SearchResult> {
    let body = encode_search_request(request);
    tracing::debug!(index = %self.config.index, %body, "searching");

    let path = format!("{}/_search", self.config.index);
    let resp = self
      .auth(self.client.post(self.url(&path)))
      .json(&body)
      .send()
      .await?;
    let bytes = Self::check(resp).await?.bytes().await?;
    decode_search_response(&bytes)
  }
}
