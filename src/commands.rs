//! The two user-facing commands: expand abbreviation and wrap with abbreviation.
//!
//! Both take an explicit snapshot of the editor (`None` when no editor is
//! active) and the settings in effect, and report everything user-visible
//! through the [`EditorHost`]. Neither returns an error: failures become
//! notices or silent aborts.

use std::sync::Arc;

use serde::Deserialize;

use crate::abbreviation::{
    ExpansionBatch, ExpansionRequest, expand_all, is_abbreviation_valid, is_valid_location,
    locate_abbreviation, prepare_wrap_range, wrap_text_for,
};
use crate::config::EmmetSettings;
use crate::document::{DocumentParser, EditorSnapshot, SyntaxTree};
use crate::editor::{EditorHost, INVALID_ABBREVIATION, NO_ACTIVE_EDITOR, Notice};
use crate::engine::ExpansionEngine;
use crate::syntax::{Dialect, LanguageArgs, resolve_dialect};

/// Collaborators shared by the commands.
pub struct CommandContext<'a, H, P, E: ?Sized> {
    pub host: &'a Arc<H>,
    pub parser: &'a P,
    pub engine: &'a E,
    pub settings: &'a EmmetSettings,
}

/// Arguments of the wrap command.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct WrapArgs {
    /// Abbreviation to wrap with; the user is prompted when absent
    #[serde(default)]
    pub abbreviation: Option<String>,
}

/// Expand the abbreviation at every cursor.
///
/// Returns `None` when nothing was attempted, otherwise whether the document
/// was edited.
pub async fn expand_abbreviation<H, P, E>(
    ctx: &CommandContext<'_, H, P, E>,
    editor: Option<&EditorSnapshot>,
    args: &LanguageArgs,
) -> Option<bool>
where
    H: EditorHost,
    P: DocumentParser,
    E: ExpansionEngine + ?Sized,
{
    let editor = require_editor(ctx.host.as_ref(), editor)?;
    let document = &editor.document;

    let dialect = resolve_dialect(
        args,
        document.language_id(),
        &ctx.settings.language_mapping(),
        &ctx.settings.exclude_languages,
    )?;

    let Some(tree) = ctx.parser.parse(document) else {
        log::debug!("Document could not be parsed; nothing to expand");
        return None;
    };

    let batch = collect_expansions(ctx.host.as_ref(), editor, dialect, &tree);
    expand_all(batch, ctx.host, ctx.engine, ctx.settings).await
}

/// Wrap every selection with an abbreviation.
///
/// Stylesheets cannot be wrapped. When `args` carries no abbreviation the
/// user is prompted; dismissing the prompt aborts without edits.
pub async fn wrap_with_abbreviation<H, P, E>(
    ctx: &CommandContext<'_, H, P, E>,
    editor: Option<&EditorSnapshot>,
    args: &WrapArgs,
) -> Option<bool>
where
    H: EditorHost,
    P: DocumentParser,
    E: ExpansionEngine + ?Sized,
{
    let editor = require_editor(ctx.host.as_ref(), editor)?;
    let document = &editor.document;

    let dialect = resolve_dialect(
        &LanguageArgs::default(),
        document.language_id(),
        &ctx.settings.language_mapping(),
        &ctx.settings.exclude_languages,
    )
    .unwrap_or(Dialect::Html);
    if dialect.is_stylesheet() {
        log::debug!("Wrapping is not available in {} documents", dialect);
        return None;
    }

    let abbreviation = match args.abbreviation.clone() {
        Some(abbreviation) => abbreviation,
        None => ctx.host.prompt_abbreviation().await?,
    };
    let abbreviation = abbreviation.trim();
    if abbreviation.is_empty() {
        return None;
    }
    if !is_abbreviation_valid(dialect, abbreviation) {
        ctx.host.notify(Notice::error(INVALID_ABBREVIATION));
        return None;
    }

    let requests = editor
        .selections
        .iter()
        .map(|selection| {
            let range = prepare_wrap_range(document, selection);
            ExpansionRequest::wrapping(dialect, abbreviation, range, wrap_text_for(&range))
        })
        .collect();

    expand_all(ExpansionBatch::new(requests), ctx.host, ctx.engine, ctx.settings).await
}

fn require_editor<'e, H: EditorHost>(
    host: &H,
    editor: Option<&'e EditorSnapshot>,
) -> Option<&'e EditorSnapshot> {
    if editor.is_none() {
        host.notify(Notice::info(NO_ACTIVE_EDITOR));
    }
    editor
}

/// Turn every cursor into a request, dropping cursors whose abbreviation is
/// malformed (with a notice) or that sit where expansion is not allowed.
fn collect_expansions<H: EditorHost>(
    host: &H,
    editor: &EditorSnapshot,
    dialect: Dialect,
    tree: &SyntaxTree,
) -> ExpansionBatch {
    let mut requests = Vec::with_capacity(editor.selections.len());

    for selection in &editor.selections {
        let position = selection.position();
        let (range, abbreviation) =
            locate_abbreviation(&editor.document, selection, position, dialect.is_markup());

        if !is_abbreviation_valid(dialect, &abbreviation) {
            host.notify(Notice::error(INVALID_ABBREVIATION));
            continue;
        }

        if !is_valid_location(tree.node_at(position), dialect, position) {
            log::debug!(
                "Skipping '{}' at {}:{}: not a valid location for {}",
                abbreviation,
                position.line,
                position.character,
                dialect
            );
            continue;
        }

        requests.push(ExpansionRequest::new(dialect, abbreviation, range));
    }

    ExpansionBatch::new(requests)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{NodeKind, Selection, TextDocument, TreeSitterParser};
    use crate::editor::NoticeLevel;
    use crate::engine::{EngineError, ExpandOptions};
    use std::sync::Mutex;
    use tower_lsp_server::ls_types::{Position, Range};

    struct EchoEngine;

    impl ExpansionEngine for EchoEngine {
        fn expand(&self, abbreviation: &str, options: &ExpandOptions) -> Result<String, EngineError> {
            match &options.text {
                Some(_) => Ok(format!("<{abbreviation}>$TM_SELECTED_TEXT</{abbreviation}>")),
                None => Ok(format!("<{abbreviation}>$1</{abbreviation}>")),
            }
        }
    }

    #[derive(Default)]
    struct TestHost {
        prompt: Option<String>,
        notices: Mutex<Vec<Notice>>,
        insertions: Mutex<Vec<(String, Vec<Range>)>>,
    }

    impl EditorHost for TestHost {
        fn notify(&self, notice: Notice) {
            self.notices.lock().unwrap().push(notice);
        }

        async fn prompt_abbreviation(&self) -> Option<String> {
            self.prompt.clone()
        }

        async fn insert_snippet(&self, snippet: String, ranges: Vec<Range>) -> bool {
            self.insertions.lock().unwrap().push((snippet, ranges));
            true
        }
    }

    /// Parser returning a fixed tree, for stylesheet layouts.
    struct FixedParser(Option<SyntaxTree>);

    impl DocumentParser for FixedParser {
        fn parse(&self, _document: &TextDocument) -> Option<SyntaxTree> {
            self.0.clone()
        }
    }

    fn pos(line: u32, character: u32) -> Position {
        Position::new(line, character)
    }

    fn snapshot(text: &str, language: &str, cursors: &[Position]) -> EditorSnapshot {
        EditorSnapshot::new(
            TextDocument::new(text, language),
            cursors.iter().map(|p| Selection::cursor(*p)).collect(),
        )
    }

    #[tokio::test]
    async fn test_no_editor_shows_info_notice() {
        let host = Arc::new(TestHost::default());
        let settings = EmmetSettings::default();
        let ctx = CommandContext {
            host: &host,
            parser: &TreeSitterParser,
            engine: &EchoEngine,
            settings: &settings,
        };

        assert_eq!(expand_abbreviation(&ctx, None, &LanguageArgs::default()).await, None);
        assert_eq!(wrap_with_abbreviation(&ctx, None, &WrapArgs::default()).await, None);

        let notices = host.notices.lock().unwrap();
        assert_eq!(notices.len(), 2);
        assert!(notices.iter().all(|n| n == &Notice::info(NO_ACTIVE_EDITOR)));
    }

    #[tokio::test]
    async fn test_expand_inside_element() {
        let host = Arc::new(TestHost::default());
        let settings = EmmetSettings::default();
        let ctx = CommandContext {
            host: &host,
            parser: &TreeSitterParser,
            engine: &EchoEngine,
            settings: &settings,
        };
        let editor = snapshot("<body>ul</body>", "html", &[pos(0, 8)]);

        let result = expand_abbreviation(&ctx, Some(&editor), &LanguageArgs::default()).await;

        assert_eq!(result, Some(true));
        let insertions = host.insertions.lock().unwrap();
        assert_eq!(
            *insertions,
            vec![("<ul>$1</ul>".to_string(), vec![Range::new(pos(0, 6), pos(0, 8))])]
        );
    }

    #[tokio::test]
    async fn test_excluded_language_aborts_silently() {
        let host = Arc::new(TestHost::default());
        let mut settings = EmmetSettings::default();
        settings.exclude_languages = vec!["html".to_string()];
        let ctx = CommandContext {
            host: &host,
            parser: &TreeSitterParser,
            engine: &EchoEngine,
            settings: &settings,
        };
        let editor = snapshot("<body>ul</body>", "html", &[pos(0, 8)]);

        assert_eq!(expand_abbreviation(&ctx, Some(&editor), &LanguageArgs::default()).await, None);
        assert!(host.notices.lock().unwrap().is_empty());
        assert!(host.insertions.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_parse_failure_aborts_silently() {
        let host = Arc::new(TestHost::default());
        let settings = EmmetSettings::default();
        let ctx = CommandContext {
            host: &host,
            parser: &FixedParser(None),
            engine: &EchoEngine,
            settings: &settings,
        };
        let editor = snapshot("m10", "css", &[pos(0, 3)]);

        assert_eq!(expand_abbreviation(&ctx, Some(&editor), &LanguageArgs::default()).await, None);
        assert!(host.notices.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_invalid_abbreviation_notifies_and_other_cursors_proceed() {
        let host = Arc::new(TestHost::default());
        let settings = EmmetSettings::default();
        let ctx = CommandContext {
            host: &host,
            parser: &FixedParser(Some(SyntaxTree::new())),
            engine: &EchoEngine,
            settings: &settings,
        };
        let editor = snapshot("m10\n10px", "css", &[pos(0, 3), pos(1, 4)]);

        let result = expand_abbreviation(&ctx, Some(&editor), &LanguageArgs::default()).await;

        assert_eq!(result, Some(true));
        let notices = host.notices.lock().unwrap();
        assert_eq!(notices.len(), 1);
        assert_eq!(notices[0].level, NoticeLevel::Error);
        assert_eq!(notices[0].message, INVALID_ABBREVIATION);
        let insertions = host.insertions.lock().unwrap();
        assert_eq!(insertions.len(), 1);
        assert_eq!(insertions[0].1, vec![Range::new(pos(0, 0), pos(0, 3))]);
    }

    #[tokio::test]
    async fn test_cursor_in_selector_is_dropped_silently() {
        let mut tree = SyntaxTree::new();
        tree.push(
            None,
            NodeKind::Rule {
                selector: Range::new(pos(0, 0), pos(0, 6)),
            },
            Range::new(pos(0, 0), pos(2, 1)),
        );
        let host = Arc::new(TestHost::default());
        let settings = EmmetSettings::default();
        let ctx = CommandContext {
            host: &host,
            parser: &FixedParser(Some(tree)),
            engine: &EchoEngine,
            settings: &settings,
        };
        let editor = snapshot("a.main {\n  m10\n}", "css", &[pos(0, 4), pos(1, 5)]);

        let result = expand_abbreviation(&ctx, Some(&editor), &LanguageArgs::default()).await;

        assert_eq!(result, Some(true));
        assert!(host.notices.lock().unwrap().is_empty());
        let insertions = host.insertions.lock().unwrap();
        assert_eq!(insertions.len(), 1);
        assert_eq!(insertions[0].1, vec![Range::new(pos(1, 2), pos(1, 5))]);
    }

    #[tokio::test]
    async fn test_wrap_uses_argument_and_trims_line() {
        let host = Arc::new(TestHost::default());
        let settings = EmmetSettings::default();
        let ctx = CommandContext {
            host: &host,
            parser: &TreeSitterParser,
            engine: &EchoEngine,
            settings: &settings,
        };
        let editor = snapshot("  hello  ", "html", &[pos(0, 3)]);
        let args = WrapArgs {
            abbreviation: Some(" b ".to_string()),
        };

        let result = wrap_with_abbreviation(&ctx, Some(&editor), &args).await;

        assert_eq!(result, Some(true));
        let insertions = host.insertions.lock().unwrap();
        assert_eq!(
            *insertions,
            vec![(
                "<b>$TM_SELECTED_TEXT</b>".to_string(),
                vec![Range::new(pos(0, 2), pos(0, 7))]
            )]
        );
    }

    #[tokio::test]
    async fn test_wrap_prompts_and_dismissal_aborts() {
        let host = Arc::new(TestHost::default());
        let settings = EmmetSettings::default();
        let ctx = CommandContext {
            host: &host,
            parser: &TreeSitterParser,
            engine: &EchoEngine,
            settings: &settings,
        };
        let editor = snapshot("hello", "html", &[pos(0, 0)]);

        assert_eq!(wrap_with_abbreviation(&ctx, Some(&editor), &WrapArgs::default()).await, None);
        assert!(host.insertions.lock().unwrap().is_empty());
        assert!(host.notices.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_wrap_with_prompted_abbreviation() {
        let host = Arc::new(TestHost {
            prompt: Some("p".to_string()),
            ..Default::default()
        });
        let settings = EmmetSettings::default();
        let ctx = CommandContext {
            host: &host,
            parser: &TreeSitterParser,
            engine: &EchoEngine,
            settings: &settings,
        };
        let editor = snapshot("hello", "html", &[pos(0, 0)]);

        assert_eq!(
            wrap_with_abbreviation(&ctx, Some(&editor), &WrapArgs::default()).await,
            Some(true)
        );
        assert_eq!(host.insertions.lock().unwrap()[0].0, "<p>$TM_SELECTED_TEXT</p>");
    }

    #[tokio::test]
    async fn test_wrap_in_stylesheet_aborts_silently() {
        let host = Arc::new(TestHost::default());
        let settings = EmmetSettings::default();
        let ctx = CommandContext {
            host: &host,
            parser: &TreeSitterParser,
            engine: &EchoEngine,
            settings: &settings,
        };
        let editor = snapshot("a {}", "css", &[pos(0, 0)]);
        let args = WrapArgs {
            abbreviation: Some("div".to_string()),
        };

        assert_eq!(wrap_with_abbreviation(&ctx, Some(&editor), &args).await, None);
        assert!(host.notices.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_wrap_invalid_abbreviation_notifies() {
        let host = Arc::new(TestHost::default());
        let settings = EmmetSettings::default();
        let ctx = CommandContext {
            host: &host,
            parser: &TreeSitterParser,
            engine: &EchoEngine,
            settings: &settings,
        };
        let editor = snapshot("hello", "html", &[pos(0, 0)]);
        let args = WrapArgs {
            abbreviation: Some("div>".to_string()),
        };

        assert_eq!(wrap_with_abbreviation(&ctx, Some(&editor), &args).await, None);
        assert_eq!(
            *host.notices.lock().unwrap(),
            vec![Notice::error(INVALID_ABBREVIATION)]
        );
    }
}
