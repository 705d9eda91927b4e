//! Emission state shared by every viewer.
//!
//! The `ViewContext` owns the output buffer, the indentation counter and the
//! effective configuration of one translation.

use crate::config::INDENT_WIDTH;
use crate::{Config, ConfigKind, ViewError};

/// Output buffer and indentation of one translation.
#[derive(Clone, Debug)]
pub struct ViewContext {
    /// Viewer defaults merged with the caller's configuration.
    config: Config,
    /// Current indentation level.
    indent: usize,
    /// Spaces per indentation level.
    indent_width: usize,
    output: String,
}

impl ViewContext {
    pub fn new(config: Config) -> Self {
        let indent_width = config.usize_or(ConfigKind::IndentWidth, INDENT_WIDTH);
        Self {
            config,
            indent: 0,
            indent_width,
            output: String::with_capacity(1024),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// A boolean parameter, `false` when unset.
    #[inline]
    pub fn flag(&self, kind: ConfigKind) -> bool {
        self.config.bool_or(kind, false)
    }

    pub fn indent_level(&self) -> usize {
        self.indent
    }

    /// Increase indentation level.
    pub fn indent(&mut self) {
        self.indent += 1;
    }

    /// Decrease indentation level.
    pub fn dedent(&mut self) -> Result<(), ViewError> {
        self.indent = self
            .indent
            .checked_sub(1)
            .ok_or(ViewError::IndentUnderflow)?;
        Ok(())
    }

    /// Write indentation to output.
    pub fn write_indent(&mut self) {
        let width = self.indent * self.indent_width;
        self.output.extend(std::iter::repeat(' ').take(width));
    }

    pub fn write(&mut self, s: &str) {
        self.output.push_str(s);
    }

    /// Write a line with indentation and newline.
    pub fn writeln(&mut self, s: &str) {
        self.write_indent();
        self.output.push_str(s);
        self.output.push('\n');
    }

    pub fn newline(&mut self) {
        self.output.push('\n');
    }

    /// Whether the buffer ends with a blank line or is empty.
    pub fn at_paragraph_start(&self) -> bool {
        self.output.is_empty() || self.output.ends_with("\n\n")
    }

    /// Take the generated output.
    pub fn take_output(&mut self) -> String {
        std::mem::take(&mut self.output)
    }
}
