//! The command loop.
//!
//! Reads one command per line and runs it to completion before reading the
//! next. An empty line or end of input ends the loop. Engine failures are
//! printed and the loop carries on; only console I/O errors abort it.

use std::io::{BufRead, Write};

use aktor_core::{
  engine::SearchEngine,
  query::SearchRequest,
  result::{BulkReport, SearchResult},
  schema::IndexSchema,
};
use aktor_seed::RecordFactory;
use anyhow::Result;
use rand::Rng;

use crate::command::{Command, help_text};

pub struct CommandLoop<E, R> {
  engine:   E,
  factory:  RecordFactory<R>,
  schema:   IndexSchema,
  max_hits: usize,
}

impl<E: SearchEngine, R: Rng> CommandLoop<E, R> {
  pub fn new(
    engine: E,
    factory: RecordFactory<R>,
    schema: IndexSchema,
    max_hits: usize,
  ) -> Self {
    Self { engine, factory, schema, max_hits }
  }

  #[cfg(test)]
  pub fn engine(&self) -> &E { &self.engine }

  /// Run until an empty line or end of input.
  pub async fn run(
    &mut self,
    input: &mut impl BufRead,
    output: &mut impl Write,
  ) -> Result<()> {
    while let Some(line) = read_line(input)? {
      if line.is_empty() {
        break;
      }
      match Command::parse(&line) {
        Some(command) => {
          tracing::debug!(%command, "dispatching");
          self.execute(command, input, output).await?;
        }
        None => output.write_all(help_text().as_bytes())?,
      }
      output.flush()?;
    }
    writeln!(output, "Ending")?;
    output.flush()?;
    Ok(())
  }

  async fn execute(
    &mut self,
    command: Command,
    input: &mut impl BufRead,
    output: &mut impl Write,
  ) -> Result<()> {
    match command {
      Command::Help => output.write_all(help_text().as_bytes())?,
      Command::CreateIndex => match self.engine.create_index(&self.schema).await {
        Ok(()) => writeln!(output, "Index created")?,
        Err(e) => writeln!(output, "error: {e}")?,
      },
      Command::Index => {
        let actors = self.factory.generate_all();
        match self.engine.bulk_index(&actors).await {
          Ok(report) => print_bulk_report(&report, output)?,
          Err(e) => writeln!(output, "error: {e}")?,
        }
      }
      Command::Query => {
        writeln!(output, "Search query <empty = no search>: ")?;
        output.flush()?;
        let free_text = read_line(input)?.unwrap_or_default();
        writeln!(output, "Filter <empty = no filter>: ")?;
        output.flush()?;
        let filter = read_line(input)?.unwrap_or_default();

        let request =
          SearchRequest::from_input(Some(&free_text), Some(&filter), self.max_hits);
        match self.engine.search(&request).await {
          Ok(result) => print_search_result(&result, output)?,
          Err(e) => writeln!(output, "error: {e}")?,
        }
      }
    }
    Ok(())
  }
}

/// Read one line without its terminator; `None` at end of input. Bytes that
/// are not UTF-8 are replaced, so a line typed in another encoding still
/// reaches the dispatcher.
fn read_line(input: &mut impl BufRead) -> Result<Option<String>> {
  let mut buf = Vec::new();
  if input.read_until(b'\n', &mut buf)? == 0 {
    return Ok(None);
  }
  let line = String::from_utf8_lossy(&buf);
  Ok(Some(line.trim_end_matches(['\n', '\r']).to_owned()))
}

fn print_bulk_report(report: &BulkReport, output: &mut impl Write) -> Result<()> {
  if report.is_complete() {
    writeln!(output, "Indexed {} documents", report.indexed)?;
    return Ok(());
  }
  writeln!(
    output,
    "Indexed {} documents, {} failed",
    report.indexed,
    report.failures.len()
  )?;
  for failure in &report.failures {
    writeln!(
      output,
      "failed: {} ({}): {}",
      failure.id, failure.status, failure.reason
    )?;
  }
  Ok(())
}

fn print_search_result(result: &SearchResult, output: &mut impl Write) -> Result<()> {
  writeln!(output, "{} hits ({} ms)", result.total, result.took_ms)?;
  for actor in &result.documents {
    writeln!(output, "{actor}")?;
  }
  writeln!(output, "Highlights:")?;
  for (key, fields) in &result.highlights {
    let rendered: Vec<String> = fields
      .iter()
      .map(|(field, hit)| {
        format!(
          "{field}, {}, {}, {}",
          hit.document_id,
          hit.field,
          hit.fragments.join(", ")
        )
      })
      .collect();
    writeln!(output, "{key}: {}", rendered.join(", "))?;
  }
  Ok(())
}
