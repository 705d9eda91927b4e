//! Viewer configuration.
//!
//! A [`Config`] maps each parameter kind to at most one value. Configurations
//! are immutable once built; combining them produces a new one.
//!
//! # Decision
//!
//! Parameters are a closed enum keyed by the fieldless [`ConfigKind`], so
//! lookups are by kind and a kind can never hold a value of the wrong type.
//! Merging is right-biased: the argument's value wins for every kind it sets.

use std::collections::BTreeMap;
use std::fmt;

use crate::ConfigError;

/// Default indentation width in spaces.
pub const INDENT_WIDTH: usize = 4;

/// One configuration parameter with its value.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ConfigParameter {
    /// `if (x) {` rather than `{` on its own line.
    BracesOnSameLine(bool),
    /// Wrap every `case` body of a `switch` in braces.
    BracesAroundCaseBranches(bool),
    /// Declare a variable at its first assignment.
    AutoVariableDeclaration(bool),
    /// Wrap loose statements in the target's program skeleton.
    TranslationUnitMode(bool),
    /// Keep `a < b and b < c` as written instead of chaining it.
    DisableCompoundComparisonConversion(bool),
    /// Render a lone expression bare, without statement syntax.
    ExpressionMode(bool),
    IndentWidth(usize),
}

/// The kind of a [`ConfigParameter`], its key in a [`Config`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ConfigKind {
    BracesOnSameLine,
    BracesAroundCaseBranches,
    AutoVariableDeclaration,
    TranslationUnitMode,
    DisableCompoundComparisonConversion,
    ExpressionMode,
    IndentWidth,
}

impl ConfigKind {
    pub const ALL: [ConfigKind; 7] = [
        Self::BracesOnSameLine,
        Self::BracesAroundCaseBranches,
        Self::AutoVariableDeclaration,
        Self::TranslationUnitMode,
        Self::DisableCompoundComparisonConversion,
        Self::ExpressionMode,
        Self::IndentWidth,
    ];

    /// The `key=value` spelling of this kind.
    pub const fn key(self) -> &'static str {
        match self {
            Self::BracesOnSameLine => "braces-on-same-line",
            Self::BracesAroundCaseBranches => "braces-around-case-branches",
            Self::AutoVariableDeclaration => "auto-variable-declaration",
            Self::TranslationUnitMode => "translation-unit-mode",
            Self::DisableCompoundComparisonConversion => "disable-compound-comparison-conversion",
            Self::ExpressionMode => "expression-mode",
            Self::IndentWidth => "indent-width",
        }
    }

    /// Look up a kind by key. Underscores are accepted in place of dashes.
    pub fn from_key(key: &str) -> Option<Self> {
        let key = key.trim().replace('_', "-");
        Self::ALL.into_iter().find(|kind| kind.key() == key)
    }
}

impl fmt::Display for ConfigKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl ConfigParameter {
    pub const fn kind(self) -> ConfigKind {
        match self {
            Self::BracesOnSameLine(_) => ConfigKind::BracesOnSameLine,
            Self::BracesAroundCaseBranches(_) => ConfigKind::BracesAroundCaseBranches,
            Self::AutoVariableDeclaration(_) => ConfigKind::AutoVariableDeclaration,
            Self::TranslationUnitMode(_) => ConfigKind::TranslationUnitMode,
            Self::DisableCompoundComparisonConversion(_) => {
                ConfigKind::DisableCompoundComparisonConversion
            }
            Self::ExpressionMode(_) => ConfigKind::ExpressionMode,
            Self::IndentWidth(_) => ConfigKind::IndentWidth,
        }
    }

    pub const fn as_bool(self) -> Option<bool> {
        match self {
            Self::BracesOnSameLine(value)
            | Self::BracesAroundCaseBranches(value)
            | Self::AutoVariableDeclaration(value)
            | Self::TranslationUnitMode(value)
            | Self::DisableCompoundComparisonConversion(value)
            | Self::ExpressionMode(value) => Some(value),
            Self::IndentWidth(_) => None,
        }
    }

    pub const fn as_usize(self) -> Option<usize> {
        match self {
            Self::IndentWidth(value) => Some(value),
            _ => None,
        }
    }

    /// Parse a `key=value` pair as given on a command line.
    pub fn parse(key: &str, value: &str) -> Result<Self, ConfigError> {
        let kind = ConfigKind::from_key(key).ok_or_else(|| ConfigError::UnknownKey(key.to_owned()))?;
        let value = value.trim();
        let flag = || match value.to_ascii_lowercase().as_str() {
            "true" | "on" | "yes" | "1" => Ok(true),
            "false" | "off" | "no" | "0" => Ok(false),
            _ => Err(ConfigError::InvalidValue {
                key: kind.key(),
                value: value.to_owned(),
                expected: "a boolean",
            }),
        };
        Ok(match kind {
            ConfigKind::BracesOnSameLine => Self::BracesOnSameLine(flag()?),
            ConfigKind::BracesAroundCaseBranches => Self::BracesAroundCaseBranches(flag()?),
            ConfigKind::AutoVariableDeclaration => Self::AutoVariableDeclaration(flag()?),
            ConfigKind::TranslationUnitMode => Self::TranslationUnitMode(flag()?),
            ConfigKind::DisableCompoundComparisonConversion => {
                Self::DisableCompoundComparisonConversion(flag()?)
            }
            ConfigKind::ExpressionMode => Self::ExpressionMode(flag()?),
            ConfigKind::IndentWidth => {
                Self::IndentWidth(value.parse().map_err(|_| ConfigError::InvalidValue {
                    key: kind.key(),
                    value: value.to_owned(),
                    expected: "a number of spaces",
                })?)
            }
        })
    }
}

/// An immutable set of parameters, at most one per kind.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Config {
    params: BTreeMap<ConfigKind, ConfigParameter>,
}

impl Config {
    /// Build from an ordered list; a later parameter replaces an earlier one
    /// of the same kind.
    pub fn new(params: impl IntoIterator<Item = ConfigParameter>) -> Self {
        Self {
            params: params.into_iter().map(|p| (p.kind(), p)).collect(),
        }
    }

    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    pub fn get(&self, kind: ConfigKind) -> Option<ConfigParameter> {
        self.params.get(&kind).copied()
    }

    pub fn contains(&self, kind: ConfigKind) -> bool {
        self.params.contains_key(&kind)
    }

    pub fn len(&self) -> usize {
        self.params.len()
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    /// Parameters in kind order.
    pub fn iter(&self) -> impl Iterator<Item = ConfigParameter> + '_ {
        self.params.values().copied()
    }

    /// The flag set for `kind`, `default` when absent.
    pub fn bool_or(&self, kind: ConfigKind, default: bool) -> bool {
        self.get(kind).and_then(ConfigParameter::as_bool).unwrap_or(default)
    }

    pub fn usize_or(&self, kind: ConfigKind, default: usize) -> usize {
        self.get(kind).and_then(ConfigParameter::as_usize).unwrap_or(default)
    }

    /// Combine with `other`; `other`'s parameters win.
    #[must_use]
    pub fn merge(&self, other: &Config) -> Config {
        let mut params = self.params.clone();
        params.extend(other.params.iter().map(|(&kind, &param)| (kind, param)));
        Config { params }
    }

    /// Merge in order; later configurations take priority.
    pub fn merge_all<'c>(configs: impl IntoIterator<Item = &'c Config>) -> Config {
        configs
            .into_iter()
            .fold(Config::default(), |acc, next| acc.merge(next))
    }

    /// The parameters matching `keep`.
    #[must_use]
    pub fn subset(&self, mut keep: impl FnMut(&ConfigParameter) -> bool) -> Config {
        Config {
            params: self
                .params
                .iter()
                .filter(|(_, param)| keep(param))
                .map(|(&kind, &param)| (kind, param))
                .collect(),
        }
    }
}

impl FromIterator<ConfigParameter> for Config {
    fn from_iter<I: IntoIterator<Item = ConfigParameter>>(iter: I) -> Self {
        Config::new(iter)
    }
}

/// Incremental construction of a [`Config`].
#[derive(Clone, Debug, Default)]
pub struct ConfigBuilder {
    params: Vec<ConfigParameter>,
}

impl ConfigBuilder {
    #[must_use]
    pub fn with(mut self, param: ConfigParameter) -> Self {
        self.params.push(param);
        self
    }

    /// Parse and add a `key=value` pair.
    pub fn with_pair(self, key: &str, value: &str) -> Result<Self, ConfigError> {
        Ok(self.with(ConfigParameter::parse(key, value)?))
    }

    pub fn build(self) -> Config {
        Config::new(self.params)
    }
}
