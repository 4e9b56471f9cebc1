//! Rendering TextMate snippets into the plain text of a workspace edit.
//!
//! LSP clients cannot be asked to run snippet insertion from a command, so
//! tabstops collapse to their default text and variables are resolved here.

use std::iter::Peekable;
use std::str::Chars;

/// Values available to `$NAME` variables while rendering.
#[derive(Debug, Clone, Copy, Default)]
pub struct SnippetContext<'a> {
    /// Text the snippet replaces; the value of `TM_SELECTED_TEXT`
    pub selected_text: &'a str,
    /// Indentation of the insertion line, repeated after every snippet line break
    pub indent: &'a str,
}

/// Render `snippet` to plain text.
///
/// Tabstops become their placeholder text (or nothing), choices become their
/// first option, and unknown variables render their default (or nothing).
pub fn render_snippet(snippet: &str, context: SnippetContext<'_>) -> String {
    let mut renderer = Renderer {
        chars: snippet.chars().peekable(),
        context,
    };
    let mut out = String::with_capacity(snippet.len());
    renderer.render_until(&mut out, None);
    out
}

struct Renderer<'s, 'c> {
    chars: Peekable<Chars<'s>>,
    context: SnippetContext<'c>,
}

impl<'c> Renderer<'_, 'c> {
    /// Render until `stop` is consumed or the input ends.
    fn render_until(&mut self, out: &mut String, stop: Option<char>) {
        while let Some(ch) = self.chars.next() {
            if Some(ch) == stop {
                return;
            }
            match ch {
                '\\' => match self.chars.peek().copied() {
                    Some(next @ ('$' | '}' | '\\')) => {
                        self.chars.next();
                        out.push(next);
                    }
                    _ => out.push('\\'),
                },
                '$' => self.render_dollar(out),
                '\n' => {
                    out.push('\n');
                    out.push_str(self.context.indent);
                }
                other => out.push(other),
            }
        }
    }

    fn render_dollar(&mut self, out: &mut String) {
        match self.chars.peek().copied() {
            Some(c) if c.is_ascii_digit() => {
                self.take_while(|c| c.is_ascii_digit());
            }
            Some(c) if is_variable_start(c) => {
                let name = self.take_while(is_variable_char);
                out.push_str(self.variable(&name).unwrap_or(""));
            }
            Some('{') => {
                self.chars.next();
                self.render_braced(out);
            }
            _ => out.push('$'),
        }
    }

    /// Render `${...}` after the opening brace.
    fn render_braced(&mut self, out: &mut String) {
        let name = self.take_while(is_variable_char);
        let is_tabstop = !name.is_empty() && name.chars().all(|c| c.is_ascii_digit());
        let value = if is_tabstop { None } else { self.variable(&name) };

        match self.chars.next() {
            Some('}') => out.push_str(value.unwrap_or("")),
            Some(':') => {
                let mut default = String::new();
                self.render_until(&mut default, Some('}'));
                match value {
                    Some(value) => out.push_str(value),
                    None => out.push_str(&default),
                }
            }
            Some('|') if is_tabstop => out.push_str(&self.first_choice()),
            other => {
                out.push_str("${");
                out.push_str(&name);
                if let Some(c) = other {
                    out.push(c);
                }
            }
        }
    }

    /// Consume `a,b,c|}` and return `a`.
    fn first_choice(&mut self) -> String {
        let mut first = String::new();
        let mut in_first = true;
        while let Some(ch) = self.chars.next() {
            match ch {
                '\\' => {
                    if let Some(next) = self.chars.next()
                        && in_first
                    {
                        first.push(next);
                    }
                }
                ',' => in_first = false,
                '|' if self.chars.peek() == Some(&'}') => {
                    self.chars.next();
                    break;
                }
                other if in_first => first.push(other),
                _ => {}
            }
        }
        first
    }

    fn variable(&self, name: &str) -> Option<&'c str> {
        match name {
            "TM_SELECTED_TEXT" if !self.context.selected_text.is_empty() => {
                Some(self.context.selected_text)
            }
            _ => None,
        }
    }

    fn take_while(&mut self, predicate: impl Fn(char) -> bool) -> String {
        let mut taken = String::new();
        while let Some(&c) = self.chars.peek() {
            if !predicate(c) {
                break;
            }
            taken.push(c);
            self.chars.next();
        }
        taken
    }
}

fn is_variable_start(c: char) -> bool {
    c == '_' || c.is_ascii_alphabetic()
}

fn is_variable_char(c: char) -> bool {
    c == '_' || c.is_ascii_alphanumeric()
}

/// Leading whitespace of a line
pub fn line_indent(line: &str) -> &str {
    let end = line.len() - line.trim_start_matches([' ', '\t']).len();
    &line[..end]
}
