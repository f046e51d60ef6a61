//! Compiler options.
//!
//! Options are read from JSON with camelCase keys; every key is optional.
//!
//! ```json
//! {
//!   "pedantic": true,
//!   "anonymousInterfacePrefix": "Anon",
//!   "typeSubstitutions": [{ "from": "Promise", "to": "js.Promise" }],
//!   "disabledPasses": ["hoisting"]
//! }
//! ```

use anyhow::{Context, Result, bail};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tsnorm_passes::PASS_ORDER;
use tsnorm_passes::extract_classes::DEFAULT_BACKUP_SUFFIX;
use tsnorm_passes::extract_interfaces::DEFAULT_PREFIX;
use tsnorm_tree::{QIdent, Type};

/// Replace references to `from` with references to `to`. Both are dotted
/// names (`ns.Name`). Only references written without type arguments match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeSubstitution {
    pub from: String,
    pub to: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CompilerOptions {
    /// Warn about references that resolve to nothing.
    pub pedantic: bool,
    /// Give each pass's root scope a fresh resolution cache.
    pub enable_scope_cache: bool,
    /// Prefix of extracted interfaces that have no name hint.
    pub anonymous_interface_prefix: String,
    /// Suffix extract-classes appends when the preferred class name is taken.
    pub class_backup_suffix: String,
    pub type_substitutions: Vec<TypeSubstitution>,
    /// Passes to skip. The remaining passes keep their fixed order.
    pub disabled_passes: Vec<String>,
}

impl Default for CompilerOptions {
    fn default() -> Self {
        CompilerOptions {
            pedantic: false,
            enable_scope_cache: true,
            anonymous_interface_prefix: DEFAULT_PREFIX.to_string(),
            class_backup_suffix: DEFAULT_BACKUP_SUFFIX.to_string(),
            type_substitutions: Vec::new(),
            disabled_passes: Vec::new(),
        }
    }
}

impl CompilerOptions {
    pub fn from_json_str(source: &str) -> Result<Self> {
        let options: CompilerOptions =
            serde_json::from_str(source).context("failed to parse compiler options")?;
        options.validate()?;
        Ok(options)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let source = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read compiler options: {}", path.display()))?;
        Self::from_json_str(&source)
            .with_context(|| format!("invalid compiler options: {}", path.display()))
    }

    pub fn validate(&self) -> Result<()> {
        for name in &self.disabled_passes {
            if !PASS_ORDER.contains(&name.as_str()) {
                bail!(
                    "unknown pass '{}' in disabledPasses (known passes: {})",
                    name,
                    PASS_ORDER.join(", ")
                );
            }
        }
        if !is_identifier(&self.anonymous_interface_prefix) {
            bail!(
                "anonymousInterfacePrefix '{}' is not an identifier",
                self.anonymous_interface_prefix
            );
        }
        if self.class_backup_suffix.is_empty() {
            bail!("classBackupSuffix must not be empty");
        }
        for sub in &self.type_substitutions {
            if !is_dotted_name(&sub.from) || !is_dotted_name(&sub.to) {
                bail!(
                    "typeSubstitutions entry '{}' -> '{}' is not a pair of dotted names",
                    sub.from,
                    sub.to
                );
            }
        }
        Ok(())
    }

    pub fn is_enabled(&self, pass: &str) -> bool {
        !self.disabled_passes.iter().any(|p| p == pass)
    }

    /// The substitution map handed to the type-rewriter pass.
    pub fn substitution_map(&self) -> FxHashMap<Type, Type> {
        self.type_substitutions
            .iter()
            .map(|sub| {
                (
                    Type::reference(QIdent::parse(&sub.from), Vec::new()),
                    Type::reference(QIdent::parse(&sub.to), Vec::new()),
                )
            })
            .collect()
    }
}

fn is_identifier(value: &str) -> bool {
    let mut chars = value.chars();
    chars
        .next()
        .is_some_and(|c| c.is_alphabetic() || c == '_' || c == '$')
        && chars.all(|c| c.is_alphanumeric() || c == '_' || c == '$')
}

fn is_dotted_name(value: &str) -> bool {
    value.split('.').all(is_identifier)
}
