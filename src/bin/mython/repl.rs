use rustyline::error::ReadlineError;
use rustyline::Editor;

use mython::Interpreter;

struct Repl {
  interp: Interpreter,
  editor: Editor<()>,
}

enum ParseResult {
  Incomplete,
  Complete,
}

impl Repl {
  fn new() -> rustyline::Result<Self> {
    Ok(Repl {
      interp: Interpreter::builder().build(),
      editor: Editor::<()>::new()?,
    })
  }

  /// Read lines until `buffer` holds a statement whose indentation has
  /// fully dedented back to nothing.
  fn read_multi_line_input(&mut self, buffer: &mut String) -> Result<(), ReadlineError> {
    let mut prev_line = String::new();
    loop {
      if !buffer.is_empty() {
        buffer.push('\n');
      }
      let ws_len = prev_line
        .chars()
        .take_while(|c| c.is_ascii_whitespace())
        .count();
      let ws = prev_line[..ws_len].to_string();
      let prompt = if buffer.is_empty() { "my> " } else { ".. > " };
      let line = self.editor.readline_with_initial(prompt, (&ws, ""))?;
      prev_line = line.clone();
      self.editor.add_history_entry(line.as_str());
      buffer.push_str(&line);

      match validate(buffer) {
        ParseResult::Incomplete => continue,
        ParseResult::Complete => return Ok(()),
      }
    }
  }
}

fn is_empty(line: &str) -> bool {
  line.trim().is_empty()
}

fn is_indented(line: &str) -> bool {
  line.starts_with(|c: char| c.is_ascii_whitespace())
}

fn begins_block(line: &str) -> bool {
  line.trim_end().ends_with(':')
}

/// Decide whether `input` looks like a finished statement (matching
/// indentation, not ending mid-block) before even trying to parse it —
/// a premature parse would just fail on the missing dedent.
fn validate(input: &str) -> ParseResult {
  let is_multi_line = input.contains('\n');
  let last_line = input.rsplit('\n').next().unwrap_or(input);
  if is_multi_line {
    if !is_empty(last_line) && (is_indented(last_line) || begins_block(last_line)) {
      return ParseResult::Incomplete;
    }
  } else if begins_block(input) {
    return ParseResult::Incomplete;
  }
  ParseResult::Complete
}

const VERSION: &str = env!("CARGO_PKG_VERSION");

pub fn run() -> rustyline::Result<()> {
  let mut repl = Repl::new()?;
  let mut buffer = String::new();

  println!("Mython REPL v{VERSION}");
  println!("Press CTRL-D to exit");

  loop {
    buffer.clear();

    match repl.read_multi_line_input(&mut buffer) {
      Ok(()) => {}
      Err(ReadlineError::Eof) | Err(ReadlineError::Interrupted) => return Ok(()),
      Err(ReadlineError::WindowResized) => continue,
      Err(e) => return Err(e),
    }

    buffer.push('\n');
    if let Err(e) = repl.interp.run(&buffer) {
      println!("{}", e.report(&buffer));
    }
  }
}
