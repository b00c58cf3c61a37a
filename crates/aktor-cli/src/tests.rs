//! Command loop tests against an in-memory engine.

use std::{collections::BTreeMap, sync::Mutex};

use aktor_core::{
  actor::Actor,
  engine::SearchEngine,
  query::{DEFAULT_MAX_HITS, SearchRequest},
  result::{BulkFailure, BulkReport, HighlightHit, SearchResult},
  schema::{FieldMapping, IndexSchema, fields},
};
use aktor_elastic::Error;
use aktor_seed::RecordFactory;
use rand::{SeedableRng, rngs::StdRng};

use crate::{command::help_text, console::CommandLoop};

// ─── In-memory engine ────────────────────────────────────────────────────────

/// Stores documents in a map and evaluates requests the way the real engine
/// would for this index: blank free text matches everything, otherwise a
/// case-insensitive match on `name`; the nested filter needs one grant with
/// exactly the given description.
#[derive(Default)]
struct InMemoryEngine {
  created:   Mutex<bool>,
  documents: Mutex<BTreeMap<String, Actor>>,
  /// Id the engine refuses during bulk indexing.
  reject:    Option<String>,
}

impl InMemoryEngine {
  fn rejecting(id: &str) -> Self {
    Self { reject: Some(id.to_owned()), ..Self::default() }
  }
}

impl SearchEngine for InMemoryEngine {
  type Error = Error;

  async fn create_index(&self, schema: &IndexSchema) -> Result<(), Error> {
    let mut created = self.created.lock().unwrap();
    if *created {
      return Err(Error::Engine {
        status:  400,
        message: "resource_already_exists_exception: index [aktorer] already exists"
          .into(),
      });
    }
    assert!(schema.get(fields::GRANTS).is_some_and(FieldMapping::is_nested));
    *created = true;
    Ok(())
  }

  async fn bulk_index(&self, actors: &[Actor]) -> Result<BulkReport, Error> {
    let mut documents = self.documents.lock().unwrap();
    let mut report = BulkReport::default();
    for actor in actors {
      if self.reject.as_deref() == Some(actor.id.as_str()) {
        report.failures.push(BulkFailure {
          id:     actor.id.clone(),
          status: 400,
          reason: "mapper_parsing_exception: boom".into(),
        });
      } else {
        documents.insert(actor.id.clone(), actor.clone());
        report.indexed += 1;
      }
    }
    Ok(report)
  }

  async fn search(&self, request: &SearchRequest) -> Result<SearchResult, Error> {
    if !*self.created.lock().unwrap() {
      return Err(Error::Engine {
        status:  404,
        message: "index_not_found_exception: no such index [aktorer]".into(),
      });
    }

    let free_text = request.free_text();
    let needle = free_text.text().trim().to_lowercase();
    let documents: Vec<Actor> = self
      .documents
      .lock()
      .unwrap()
      .values()
      .filter(|a| free_text.is_match_all() || a.name.to_lowercase().contains(&needle))
      .filter(|a| {
        request
          .filter()
          .is_none_or(|term| a.has_grant_described(term.value()))
      })
      .take(request.size())
      .cloned()
      .collect();

    let mut result = SearchResult {
      total: documents.len() as u64,
      ..SearchResult::default()
    };
    if !free_text.is_match_all() {
      for field in &request.highlight().fields {
        for actor in &documents {
          let hit = HighlightHit {
            document_id: actor.id.clone(),
            field:       field.name.clone(),
            fragments:   vec![format!("{}{}{}", field.tags.pre, actor.name, field.tags.post)],
          };
          result
            .highlights
            .entry(actor.id.clone())
            .or_default()
            .insert(field.name.clone(), hit);
        }
      }
    }
    result.documents = documents;
    Ok(result)
  }
}

// ─── Helpers ─────────────────────────────────────────────────────────────────

async fn run_script(
  engine: InMemoryEngine,
  seed: u64,
  script: impl AsRef<[u8]>,
) -> (String, CommandLoop<InMemoryEngine, StdRng>) {
  let mut console = CommandLoop::new(
    engine,
    RecordFactory::new(StdRng::seed_from_u64(seed)),
    IndexSchema::actors(),
    DEFAULT_MAX_HITS,
  );
  let mut output = Vec::new();
  console.run(&mut script.as_ref(), &mut output).await.unwrap();
  (String::from_utf8(output).unwrap(), console)
}

/// Ids of the actors printed by `q`, in output order.
fn printed_ids(output: &str) -> Vec<String> {
  output
    .lines()
    .filter(|line| line.starts_with("f_") || line.starts_with("p_"))
    .filter_map(|line| line.split_once(", ").map(|(id, _)| id.to_owned()))
    .collect()
}

// ─── Loop control ────────────────────────────────────────────────────────────

#[tokio::test]
async fn empty_line_ends_the_loop() {
  let (output, console) = run_script(InMemoryEngine::default(), 0, "\nci\n").await;
  assert_eq!(output, "Ending\n");
  assert!(!*console.engine().created.lock().unwrap());
}

#[tokio::test]
async fn end_of_input_ends_the_loop() {
  let (output, _) = run_script(InMemoryEngine::default(), 0, "").await;
  assert_eq!(output, "Ending\n");
}

#[tokio::test]
async fn unknown_command_prints_help_and_continues() {
  let (output, _) = run_script(InMemoryEngine::default(), 0, "x\nh\n\n").await;
  assert_eq!(output, format!("{0}{0}Ending\n", help_text()));
}

#[tokio::test]
async fn undecodable_line_prints_help_and_continues() {
  let (output, console) =
    run_script(InMemoryEngine::default(), 0, b"\xff\xfe\nci\n\n").await;
  assert!(output.starts_with(&help_text()));
  assert!(output.contains("Index created"));
  assert!(output.ends_with("Ending\n"));
  assert!(*console.engine().created.lock().unwrap());
}

#[tokio::test]
async fn commands_are_case_insensitive() {
  let (output, console) = run_script(InMemoryEngine::default(), 0, "CI\r\n\r\n").await;
  assert!(output.contains("Index created"));
  assert!(*console.engine().created.lock().unwrap());
}

#[tokio::test]
async fn engine_errors_do_not_stop_the_loop() {
  let (output, _) =
    run_script(InMemoryEngine::default(), 0, "q\n\n\nci\nci\n\n").await;
  assert!(output.contains(
    "error: engine error (404): index_not_found_exception: no such index [aktorer]"
  ));
  assert!(output.contains("Index created"));
  assert!(output.contains("error: engine error (400): resource_already_exists_exception"));
  assert!(output.ends_with("Ending\n"));
}

// ─── Scenarios ───────────────────────────────────────────────────────────────

#[tokio::test]
async fn indexed_actors_are_all_returned_by_an_empty_query() {
  let (output, console) = run_script(InMemoryEngine::default(), 1, "ci\ni\nq\n\n\n\n").await;

  assert!(output.contains("Indexed 20 documents\n"));
  assert!(output.contains("Search query <empty = no search>:"));
  assert!(output.contains("Filter <empty = no filter>:"));
  assert!(output.contains("20 hits (0 ms)\n"));

  let ids = printed_ids(&output);
  assert_eq!(ids.len(), 20);
  for i in 0..10 {
    assert!(ids.contains(&format!("f_{i}")));
    assert!(ids.contains(&format!("p_{i}")));
  }

  let request = SearchRequest::from_input(Some(""), Some(""), DEFAULT_MAX_HITS);
  let result = console.engine().search(&request).await.unwrap();
  assert_eq!(result.documents.len(), 20);
  assert!(result.highlights.is_empty());
}

#[tokio::test]
async fn filter_keeps_only_actors_with_that_grant() {
  let seed = 7;
  let generated = RecordFactory::new(StdRng::seed_from_u64(seed)).generate_all();
  let mut expected: Vec<String> = generated
    .iter()
    .filter(|a| a.has_grant_described("konsesjon av type5"))
    .map(|a| a.id.clone())
    .collect();
  expected.sort();

  let script = "ci\ni\nq\n\nkonsesjon av type5\nq\n\nkonsesjon av type0\n\n";
  let (output, console) = run_script(InMemoryEngine::default(), seed, script).await;

  // Every actor has at least three grants, so type0 matches all of them.
  let (first, second) = output.split_at(output.rfind("Search query").unwrap());
  let mut filtered = printed_ids(first);
  filtered.sort();
  assert_eq!(filtered, expected);
  assert_eq!(printed_ids(second).len(), 20);

  let request = SearchRequest::from_input(None, Some("konsesjon av type5"), DEFAULT_MAX_HITS);
  let result = console.engine().search(&request).await.unwrap();
  assert!(result
    .documents
    .iter()
    .all(|a| a.has_grant_described("konsesjon av type5")));
}

#[tokio::test]
async fn free_text_query_prints_highlights() {
  let (output, _) = run_script(InMemoryEngine::default(), 2, "ci\ni\nq\ntomas\n\n\n").await;

  let mut ids = printed_ids(output.split("Highlights:").next().unwrap());
  ids.sort();
  assert_eq!(ids, ["p_0", "p_1", "p_9"]);
  assert!(output.contains("Highlights:\n"));
  assert!(output.contains("p_0: name, p_0, name, <em>Tomas Jansson</em>\n"));
  assert!(output.contains("p_1: name, p_1, name, <em>tomas awesome</em>\n"));
}

#[tokio::test]
async fn rejected_documents_are_reported() {
  let (output, console) =
    run_script(InMemoryEngine::rejecting("p_3"), 0, "ci\ni\n\n").await;
  assert!(output.contains("Indexed 19 documents, 1 failed\n"));
  assert!(output.contains("failed: p_3 (400): mapper_parsing_exception: boom"));
  assert!(!console.engine().documents.lock().unwrap().contains_key("p_3"));
}

#[tokio::test]
async fn same_seed_prints_the_same_records() {
  let script = "ci\ni\nq\n\n\n\n";
  let (a, _) = run_script(InMemoryEngine::default(), 99, script).await;
  let (b, _) = run_script(InMemoryEngine::default(), 99, script).await;
  assert_eq!(a, b);
}
