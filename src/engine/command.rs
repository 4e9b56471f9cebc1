//! Expansion through an external program.
//!
//! The program receives `{"abbreviation": ..., "options": ...}` as JSON on
//! stdin and prints the expanded snippet on stdout.

use std::io::Write;
use std::process::{Command, Stdio};

use serde::Serialize;

use super::{EngineError, ExpandOptions, ExpansionEngine};

#[derive(Serialize)]
struct EngineRequest<'a> {
    abbreviation: &'a str,
    options: &'a ExpandOptions,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandEngine {
    program: String,
    args: Vec<String>,
}

impl CommandEngine {
    /// Returns `None` for an empty command line.
    pub fn new(command: Vec<String>) -> Option<Self> {
        let mut parts = command.into_iter();
        let program = parts.next().filter(|p| !p.is_empty())?;
        Some(Self {
            program,
            args: parts.collect(),
        })
    }

    pub fn program(&self) -> &str {
        &self.program
    }
}

impl ExpansionEngine for CommandEngine {
    fn expand(&self, abbreviation: &str, options: &ExpandOptions) -> Result<String, EngineError> {
        let payload = serde_json::to_vec(&EngineRequest {
            abbreviation,
            options,
        })?;

        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()?;

        if let Some(mut stdin) = child.stdin.take() {
            match stdin.write_all(&payload) {
                Ok(()) => {}
                // The program may answer without reading all of its input.
                Err(e) if e.kind() == std::io::ErrorKind::BrokenPipe => {
                    log::debug!("Engine '{}' closed stdin early", self.program);
                }
                Err(e) => return Err(e.into()),
            }
        }

        let output = child.wait_with_output()?;
        if !output.status.success() {
            return Err(EngineError::Failed {
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        let text = String::from_utf8(output.stdout).map_err(|_| EngineError::InvalidOutput)?;
        log::debug!(
            "Engine '{}' expanded '{}' into {} bytes",
            self.program,
            abbreviation,
            text.len()
        );
        Ok(text.trim_end_matches(['\n', '\r']).to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::get_expand_options;
    use crate::syntax::Dialect;
    use serde_json::Map;

    fn options() -> ExpandOptions {
        get_expand_options(&Map::new(), &Map::new(), Dialect::Html, None)
    }

    fn sh(script: &str) -> CommandEngine {
        CommandEngine::new(vec!["sh".to_string(), "-c".to_string(), script.to_string()])
            .expect("non-empty command")
    }

    #[test]
    fn test_empty_command_is_rejected() {
        assert_eq!(CommandEngine::new(Vec::new()), None);
        assert_eq!(CommandEngine::new(vec![String::new()]), None);
    }

    #[cfg(unix)]
    #[test]
    fn test_output_becomes_snippet() {
        let engine = sh("cat > /dev/null; printf '<ul>${1}</ul>\\n'");
        assert_eq!(engine.expand("ul", &options()).unwrap(), "<ul>${1}</ul>");
    }

    #[cfg(unix)]
    #[test]
    fn test_request_is_written_to_stdin() {
        let engine = sh("cat");
        let echoed = engine.expand("ul>li", &options()).unwrap();
        let request: serde_json::Value = serde_json::from_str(&echoed).unwrap();

        assert_eq!(request["abbreviation"], "ul>li");
        assert_eq!(request["options"]["syntax"], "html");
    }

    #[cfg(unix)]
    #[test]
    fn test_non_zero_exit_is_an_error() {
        let engine = sh("cat > /dev/null; echo boom >&2; exit 3");
        match engine.expand("ul", &options()) {
            Err(EngineError::Failed { stderr, .. }) => assert_eq!(stderr, "boom"),
            other => panic!("expected Failed, got {:?}", other),
        }
    }

    #[cfg(unix)]
    #[test]
    fn test_engine_that_ignores_stdin_still_answers() {
        let engine = sh("printf '<ul></ul>'");
        let mut variables = Map::new();
        variables.insert("filler".to_string(), "x".repeat(512 * 1024).into());
        let options = get_expand_options(&Map::new(), &variables, Dialect::Html, None);

        assert_eq!(engine.expand("ul", &options).unwrap(), "<ul></ul>");
    }

    #[test]
    fn test_missing_program_is_a_spawn_error() {
        let engine = CommandEngine::new(vec!["emmet-lsp-no-such-program".to_string()]).unwrap();
        assert!(matches!(
            engine.expand("ul", &options()),
            Err(EngineError::Spawn(_))
        ));
    }
}
