//! Meaning tree translation driver.
//!
//! Ties an external source-language parser to the viewers: source text is
//! parsed into a [`MeaningTree`] and rendered in the [`TargetLanguage`]
//! with the given [`Config`].
//!
//! ```text
//! source ──LanguageParser──▶ MeaningTree ──mt_view::emit──▶ target text
//! ```
//!
//! Parsers live outside this workspace. They implement [`LanguageParser`]
//! and hand back a tree rooted at a program entry point.

use std::sync::Once;

use mt_ir::MeaningTree;
use mt_view::ViewError;

pub mod normalize;

pub use mt_view::{Config, ConfigParameter, TargetLanguage};
pub use normalize::code_eq;

/// Parser boundary: turns source text into a meaning tree.
pub trait LanguageParser {
    type Error: std::error::Error + 'static;

    fn parse(&self, source: &str) -> Result<MeaningTree, Self::Error>;
}

/// A failed translation.
#[derive(Debug, thiserror::Error)]
pub enum TranslateError<E: std::error::Error + 'static> {
    /// The parser rejected the source. Propagated unmodified.
    #[error(transparent)]
    Parse(E),

    #[error(transparent)]
    View(#[from] ViewError),
}

/// Source-to-source translation into one target language.
pub struct Translator<P> {
    parser: P,
    target: TargetLanguage,
    config: Config,
}

impl<P: LanguageParser> Translator<P> {
    pub fn new(parser: P, target: TargetLanguage, config: Config) -> Self {
        Translator {
            parser,
            target,
            config,
        }
    }

    pub fn target(&self) -> TargetLanguage {
        self.target
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Parses `source` and renders the tree in the target language.
    #[tracing::instrument(level = "trace", skip_all, fields(language = %self.target))]
    pub fn translate(&self, source: &str) -> Result<String, TranslateError<P::Error>> {
        let tree = self.parser.parse(source).map_err(TranslateError::Parse)?;
        tracing::debug!(nodes = tree.ast().len(), "parsed source");
        self.render(&tree)
    }

    /// Renders an already parsed tree.
    pub fn render(&self, tree: &MeaningTree) -> Result<String, TranslateError<P::Error>> {
        let text = mt_view::emit(self.target, tree, &self.config)?;
        tracing::debug!(bytes = text.len(), "rendered tree");
        Ok(text)
    }
}

static TRACING_INIT: Once = Once::new();

/// Initialize tracing for debug output.
///
/// Safe to call multiple times. Enable with `RUST_LOG=mt_view=trace` or
/// `RUST_LOG=mtc=debug`.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        // Only initialize if RUST_LOG is set
        if std::env::var("RUST_LOG").is_ok() {
            let filter = EnvFilter::from_default_env();
            tracing_subscriber::registry()
                .with(fmt::layer().with_target(true).with_level(true))
                .with(filter)
                .init();
        }
    });
}
