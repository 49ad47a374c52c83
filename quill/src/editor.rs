use std::borrow::Cow;

use reedline::{
    Prompt, PromptEditMode, PromptHistorySearch, PromptHistorySearchStatus, Reedline, Signal,
    ValidationResult, Validator, Vi,
};

/// Line editor for the REPL. Input with unclosed delimiters continues on
/// the next line.
pub struct Editor {
    line:   Reedline,
    prompt: QuillPrompt,
}

impl Default for Editor {
    fn default() -> Self {
        let line = Reedline::create()
            .with_edit_mode(Box::new(Vi::default()))
            .with_validator(Box::new(OpenDelims));

        Self {
            line,
            prompt: QuillPrompt,
        }
    }
}

pub enum EditorRead {
    Read(String),
    Break,
    Continue,
}

impl Editor {
    pub fn read(&mut self) -> std::io::Result<EditorRead> {
        let read = match self.line.read_line(&self.prompt)? {
            Signal::Success(input) if input.trim().is_empty() => EditorRead::Continue,
            Signal::Success(input) => EditorRead::Read(input),
            Signal::CtrlC | Signal::CtrlD => EditorRead::Break,
        };
        Ok(read)
    }
}

/// Counts `(`, `[` and `{` left open, skipping strings and comments.
///
/// Strings end at a newline just like in the lexer, so only a string still
/// open on the last line keeps the input going.
fn open_delims(input: &str) -> (usize, bool) {
    let mut depth = 0usize;
    let mut in_string = false;
    let mut chars = input.chars();

    while let Some(c) = chars.next() {
        match c {
            '\n' => in_string = false,
            '\\' if in_string => {
                chars.next();
            }
            '"' => in_string = !in_string,
            _ if in_string => {}
            '#' => {
                chars.by_ref().find(|&c| c == '\n');
            }
            '(' | '[' | '{' => depth += 1,
            ')' | ']' | '}' => depth = depth.saturating_sub(1),
            _ => {}
        }
    }

    (depth, in_string)
}

struct OpenDelims;

impl Validator for OpenDelims {
    fn validate(&self, line: &str) -> ValidationResult {
        match open_delims(line) {
            (0, false) => ValidationResult::Complete,
            _ => ValidationResult::Incomplete,
        }
    }
}

struct QuillPrompt;

impl Prompt for QuillPrompt {
    fn render_prompt_left(&self) -> Cow<'_, str> {
        Cow::Borrowed(">> ")
    }

    fn render_prompt_right(&self) -> Cow<'_, str> {
        Cow::Borrowed("")
    }

    fn render_prompt_indicator(&self, _: PromptEditMode) -> Cow<'_, str> {
        Cow::Borrowed("")
    }

    fn render_prompt_multiline_indicator(&self) -> Cow<'_, str> {
        Cow::Borrowed(".. ")
    }

    fn render_prompt_history_search_indicator(
        &self,
        search: PromptHistorySearch,
    ) -> Cow<'_, str> {
        match search.status {
            PromptHistorySearchStatus::Passing => Cow::Owned(format!("(search: {}) ", search.term)),
            PromptHistorySearchStatus::Failing => {
                Cow::Owned(format!("(failing search: {}) ", search.term))
            }
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn complete(input: &str) -> bool {
        matches!(OpenDelims.validate(input), ValidationResult::Complete)
    }

    #[test]
    fn balanced_input_is_complete() {
        assert!(complete("print([1, {a: 2}])"));
        assert!(complete(r#"print("(\"[{")"#));
        assert!(complete("print(1) # (unclosed in a comment"));
        assert!(complete("print(1))"));
    }

    #[test]
    fn open_delimiters_continue() {
        assert!(!complete("print("));
        assert!(!complete("let r = {\n  a: [1,\n"));
        assert!(complete("let r = {\n  a: [1,\n 2]}"));
        assert!(!complete("print(\"# not a comment\""));
    }

    #[test]
    fn open_string_continues_only_on_the_last_line() {
        assert!(!complete("print(\"abc"));
        assert_eq!(open_delims("\"abc\n1"), (0, false));
        assert_eq!(open_delims("\"a\\\"b"), (0, true));
    }
}
