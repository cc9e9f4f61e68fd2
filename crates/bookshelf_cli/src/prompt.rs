//! Blocking stdin prompts for the interactive edit flow.

use anyhow::{Context, Result};
use bookshelf_core::{Book, BookEdit};
use std::io::{self, BufRead, Write};

/// Asks for title, author and year, showing the current values.
///
/// An empty answer accepts the shown value; end of input cancels that
/// prompt, which aborts the edit.
pub fn ask_edit(current: &Book) -> Result<BookEdit> {
    let stdin = io::stdin();
    let mut input = stdin.lock();
    let mut output = io::stderr();

    let title = ask(&mut input, &mut output, "New title", &current.title)?;
    let author = ask(&mut input, &mut output, "New author", &current.author)?;
    let year = ask(&mut input, &mut output, "New year", &current.year.to_string())?;
    Ok(BookEdit::new(title, author, year))
}

fn ask(
    input: &mut impl BufRead,
    output: &mut impl Write,
    label: &str,
    shown: &str,
) -> Result<Option<String>> {
    write!(output, "{label} [{shown}]: ")?;
    output.flush()?;

    let mut line = String::new();
    let read = input
        .read_line(&mut line)
        .context("failed to read prompt answer")?;
    if read == 0 {
        return Ok(None);
    }

    let answer = line.trim_end_matches(['\r', '\n']);
    if answer.is_empty() {
        Ok(Some(shown.to_string()))
    } else {
        Ok(Some(answer.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::ask;
    use std::io::Cursor;

    #[test]
    fn empty_answer_keeps_shown_value() {
        let mut input = Cursor::new("\n");
        let mut output = Vec::new();
        let answer = ask(&mut input, &mut output, "New title", "Dune").unwrap();
        assert_eq!(answer.as_deref(), Some("Dune"));
        assert_eq!(String::from_utf8(output).unwrap(), "New title [Dune]: ");
    }

    #[test]
    fn end_of_input_cancels() {
        let mut input = Cursor::new("");
        let mut output = Vec::new();
        assert_eq!(ask(&mut input, &mut output, "New year", "1965").unwrap(), None);
    }

    #[test]
    fn answer_keeps_inner_whitespace() {
        let mut input = Cursor::new("  Children of Dune \r\n");
        let mut output = Vec::new();
        let answer = ask(&mut input, &mut output, "New title", "Dune").unwrap();
        assert_eq!(answer.as_deref(), Some("  Children of Dune "));
    }
}
