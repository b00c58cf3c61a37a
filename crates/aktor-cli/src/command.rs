//! Console commands.

use strum::{Display, EnumIter, EnumMessage, EnumString, IntoEnumIterator};

/// A command key typed at the prompt. Keys match case-insensitively.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, EnumIter, EnumMessage)]
#[strum(ascii_case_insensitive)]
pub enum Command {
  #[strum(serialize = "h", message = "print this")]
  Help,
  #[strum(serialize = "ci", message = "create index")]
  CreateIndex,
  #[strum(serialize = "i", message = "index data")]
  Index,
  #[strum(serialize = "q", message = "query data")]
  Query,
}

impl Command {
  /// Parse a line typed at the prompt, ignoring surrounding whitespace.
  pub fn parse(line: &str) -> Option<Self> { line.trim().parse().ok() }
}

/// The help text, one line per command.
pub fn help_text() -> String {
  let mut text = String::from("Help for this simple console\n");
  for command in Command::iter() {
    text.push_str(&format!(
      "{command}: {}\n",
      command.get_message().unwrap_or_default()
    ));
  }
  text
}
