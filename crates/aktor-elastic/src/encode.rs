//! Encoding and decoding between aktor domain types and the Elasticsearch
//! JSON wire format.
//!
//! Requests are built as [`serde_json::Value`]s; responses are decoded through
//! private `Raw*` structs that mirror only the parts of the engine's answer
//! this crate reads.

use std::collections::BTreeMap;

use aktor_core::{
  actor::Actor,
  query::{FreeText, Highlight, NestedTerm, SearchRequest, Tags},
  result::{BulkFailure, BulkReport, HighlightHit, Highlights, SearchResult},
  schema::{FieldMapping, FieldType, IndexSchema, Indexing},
};
use serde::Deserialize;
use serde_json::{Map, Value, json};

use crate::{Error, Result};

// ─── Mappings ────────────────────────────────────────────────────────────────

/// Body of `PUT /{index}`.
pub fn encode_create_index(schema: &IndexSchema) -> Value {
  json!({
    "mappings": {
      "properties": encode_properties(&schema.fields),
    }
  })
}

fn encode_properties(fields: &BTreeMap<String, FieldMapping>) -> Value {
  let properties: Map<String, Value> = fields
    .iter()
    .map(|(name, mapping)| (name.clone(), encode_field(mapping)))
    .collect();
  Value::Object(properties)
}

fn encode_field(mapping: &FieldMapping) -> Value {
  let type_name = match (mapping.field_type, mapping.indexing) {
    (FieldType::String, Indexing::Analyzed) => "text",
    (FieldType::String, _) => "keyword",
    (FieldType::Integer, _) => "integer",
    (FieldType::Boolean, _) => "boolean",
    (FieldType::Date, _) => "date",
    (FieldType::Nested, _) => "nested",
  };

  let mut field = Map::new();
  field.insert("type".into(), type_name.into());
  if mapping.indexing == Indexing::No {
    field.insert("index".into(), false.into());
  }
  if mapping.is_nested() {
    field.insert("properties".into(), encode_properties(&mapping.properties));
  }
  Value::Object(field)
}

// ─── Bulk ────────────────────────────────────────────────────────────────────

/// NDJSON body of `POST /_bulk`: one `index` action per actor, keyed by id.
pub fn encode_bulk(index: &str, actors: &[Actor]) -> Result<String> {
  let mut body = String::new();
  for actor in actors {
    let action = json!({ "index": { "_index": index, "_id": actor.id } });
    body.push_str(&action.to_string());
    body.push('\n');
    body.push_str(&serde_json::to_string(actor)?);
    body.push('\n');
  }
  Ok(body)
}

#[derive(Deserialize)]
struct RawBulkResponse {
  #[serde(default)]
  errors: bool,
  #[serde(default)]
  items:  Vec<BTreeMap<String, RawBulkItem>>,
}

#[derive(Deserialize)]
struct RawBulkItem {
  #[serde(rename = "_id", default)]
  id:     Option<String>,
  status: u16,
  #[serde(default)]
  error:  Option<RawErrorCause>,
}

#[derive(Deserialize)]
struct RawErrorCause {
  #[serde(rename = "type", default)]
  kind:   Option<String>,
  #[serde(default)]
  reason: Option<String>,
}

impl RawErrorCause {
  fn describe(&self) -> String {
    match (&self.kind, &self.reason) {
      (Some(kind), Some(reason)) => format!("{kind}: {reason}"),
      (Some(only), None) | (None, Some(only)) => only.clone(),
      (None, None) => "unknown error".to_owned(),
    }
  }
}

pub fn decode_bulk_response(body: &[u8]) -> Result<BulkReport> {
  let raw: RawBulkResponse = serde_json::from_slice(body)?;
  let mut report = BulkReport::default();

  for entry in raw.items {
    let item = entry
      .into_values()
      .next()
      .ok_or_else(|| Error::Decode("bulk item without an action".into()))?;
    let failed = item.error.is_some() || !(200..300).contains(&item.status);
    if failed {
      report.failures.push(BulkFailure {
        id:     item.id.unwrap_or_default(),
        status: item.status,
        reason: item
          .error
          .as_ref()
          .map(RawErrorCause::describe)
          .unwrap_or_else(|| format!("status {}", item.status)),
      });
    } else {
      report.indexed += 1;
    }
  }

  if raw.errors && report.failures.is_empty() {
    return Err(Error::Decode(
      "engine reported bulk errors but no failed item".into(),
    ));
  }
  Ok(report)
}

// ─── Search ──────────────────────────────────────────────────────────────────

/// Body of `POST /{index}/_search`.
///
/// Without a filter the query is the free-text clause alone; with one, the
/// free text is a `must` and the nested term a `filter` of the same `bool`.
pub fn encode_search_request(request: &SearchRequest) -> Value {
  let free_text = encode_free_text(request.free_text());
  let query = match request.filter() {
    None => free_text,
    Some(term) => json!({
      "bool": {
        "must": [free_text],
        "filter": [encode_nested_term(term)],
      }
    }),
  };

  json!({
    "size": request.size(),
    "query": query,
    "highlight": encode_highlight(request.highlight()),
  })
}

fn encode_free_text(free_text: &FreeText) -> Value {
  if free_text.is_match_all() {
    json!({ "match_all": {} })
  } else {
    json!({ "query_string": { "query": free_text.text() } })
  }
}

fn encode_nested_term(term: &NestedTerm) -> Value {
  let mut field = Map::new();
  field.insert(term.field().to_owned(), term.value().into());
  json!({
    "nested": {
      "path": term.path(),
      "query": { "term": field },
    }
  })
}

fn encode_tags(tags: &Tags, target: &mut Map<String, Value>) {
  target.insert("pre_tags".into(), json!([tags.pre]));
  target.insert("post_tags".into(), json!([tags.post]));
}

fn encode_highlight(highlight: &Highlight) -> Value {
  let mut fields = Map::new();
  for field in &highlight.fields {
    let mut settings = Map::new();
    encode_tags(&field.tags, &mut settings);
    fields.insert(field.name.clone(), Value::Object(settings));
  }

  let mut body = Map::new();
  encode_tags(&highlight.tags, &mut body);
  body.insert("fields".into(), Value::Object(fields));
  Value::Object(body)
}

#[derive(Deserialize)]
struct RawSearchResponse {
  #[serde(default)]
  took: u64,
  hits: RawHits,
}

#[derive(Deserialize)]
struct RawHits {
  #[serde(default)]
  total: Option<RawTotal>,
  #[serde(default)]
  hits:  Vec<RawHit>,
}

/// `hits.total` is a bare number on old engines and an object on new ones.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawTotal {
  Count(u64),
  Object { value: u64 },
}

#[derive(Deserialize)]
struct RawHit {
  #[serde(rename = "_id")]
  id:        String,
  #[serde(rename = "_source")]
  source:    Actor,
  #[serde(default)]
  highlight: BTreeMap<String, Vec<String>>,
}

pub fn decode_search_response(body: &[u8]) -> Result<SearchResult> {
  let raw: RawSearchResponse = serde_json::from_slice(body)?;
  let total = match raw.hits.total {
    Some(RawTotal::Count(n)) | Some(RawTotal::Object { value: n }) => n,
    None => raw.hits.hits.len() as u64,
  };

  let mut documents = Vec::with_capacity(raw.hits.hits.len());
  let mut highlights = Highlights::new();
  for hit in raw.hits.hits {
    if !hit.highlight.is_empty() {
      let per_field = hit
        .highlight
        .into_iter()
        .map(|(field, fragments)| {
          let entry = HighlightHit {
            document_id: hit.id.clone(),
            field: field.clone(),
            fragments,
          };
          (field, entry)
        })
        .collect();
      highlights.insert(hit.id, per_field);
    }
    documents.push(hit.source);
  }

  Ok(SearchResult { total, took_ms: raw.took, documents, highlights })
}

// ─── Errors ──────────────────────────────────────────────────────────────────

#[derive(Deserialize)]
struct RawErrorBody {
  error: RawErrorField,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawErrorField {
  Cause(RawErrorCause),
  Message(String),
}

/// The engine's diagnostic from an error response body. Falls back to the raw
/// body when it is not the engine's JSON error shape.
pub fn decode_engine_error(body: &str) -> String {
  match serde_json::from_str::<RawErrorBody>(body) {
    Ok(RawErrorBody { error: RawErrorField::Cause(cause) }) => cause.describe(),
    Ok(RawErrorBody { error: RawErrorField::Message(message) }) => message,
    Err(_) if body.trim().is_empty() => "empty response body".to_owned(),
    Err(_) => body.trim().to_owned(),
  }
}
