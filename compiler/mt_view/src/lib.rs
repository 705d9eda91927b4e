//! Meaning tree viewers.
//!
//! Renders a meaning tree as source text of a target language.
//!
//! # Architecture
//!
//! Each viewer walks the tree top-down, carrying a [`ViewContext`] for
//! indentation and output and a type scope for the declarations it has
//! seen. Operands are grouped by the parenthesization engine of the
//! target's operator table, never by the parentheses of the source.
//!
//! # Modules
//!
//! - [`config`]: typed configuration with right-biased merge
//! - [`context`]: indentation and output buffer
//! - `expr`: expression rendering shared by all targets
//! - `c_family`: statement rendering shared by Java and C++
//! - [`java`], [`python`], [`cpp`]: the viewers

use std::fmt;
use std::str::FromStr;

use mt_ir::MeaningTree;

mod c_family;
pub mod config;
pub mod context;
pub mod cpp;
mod error;
mod expr;
pub mod java;
mod layout;
pub mod python;

pub use config::{Config, ConfigBuilder, ConfigKind, ConfigParameter, INDENT_WIDTH};
pub use context::ViewContext;
pub use cpp::CppViewer;
pub use error::{ConfigError, ViewError};
pub use java::JavaViewer;
pub use python::PythonViewer;

/// A language a tree can be rendered in.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum TargetLanguage {
    Java,
    Python,
    Cpp,
}

impl TargetLanguage {
    pub const ALL: [TargetLanguage; 3] = [Self::Java, Self::Python, Self::Cpp];

    pub const fn name(self) -> &'static str {
        match self {
            Self::Java => "java",
            Self::Python => "python",
            Self::Cpp => "c++",
        }
    }
}

impl fmt::Display for TargetLanguage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for TargetLanguage {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "java" => Ok(Self::Java),
            "python" | "py" => Ok(Self::Python),
            "c++" | "cpp" => Ok(Self::Cpp),
            _ => Err(ConfigError::InvalidValue {
                key: "language",
                value: s.to_owned(),
                expected: "one of java, python, c++",
            }),
        }
    }
}

/// Render `tree` in `language` with a fresh viewer.
pub fn emit(
    language: TargetLanguage,
    tree: &MeaningTree,
    config: &Config,
) -> Result<String, ViewError> {
    tracing::debug!(%language, params = config.len(), "emitting tree");
    match language {
        TargetLanguage::Java => JavaViewer::new(tree, config).emit(),
        TargetLanguage::Python => PythonViewer::new(tree, config).emit(),
        TargetLanguage::Cpp => CppViewer::new(tree, config).emit(),
    }
}
