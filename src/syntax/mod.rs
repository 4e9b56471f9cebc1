pub mod dialect;
pub mod resolver;

pub use dialect::{
    Dialect, UnknownDialect, get_emmet_mode, is_known_language_mode, is_stylesheet_language,
};
pub use resolver::{LanguageArgs, resolve_dialect};
