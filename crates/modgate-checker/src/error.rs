//! Error types for module declaration, binding and visibility checking
//!
//! Each phase reports its own error enum. All of them carry enough structured
//! data (names and locations) to render a message without going back to the
//! registry or symbol table. [`ProgramError`] is what the whole-program driver
//! collects.

use crate::span::Location;
use crate::symbols::SymbolKind;
use serde::Serialize;
use thiserror::Error;

/// Render an optional module name the way diagnostics spell it
pub fn describe_module(module: &Option<String>) -> String {
    match module {
        Some(name) => format!("module '{}'", name),
        None => "no module".to_string(),
    }
}

/// Errors raised while building the module registry
#[derive(Debug, Error, Clone, PartialEq, Eq, Serialize)]
pub enum RegistryError {
    /// The exact same module name was declared twice
    #[error("Module '{name}' is declared more than once")]
    DuplicateModule {
        /// Module name
        name: String,
        /// Location of the declaration that stays authoritative
        first: Location,
        /// Location of the rejected declaration
        second: Location,
    },
}

/// Errors raised while binding a compilation unit to its module
#[derive(Debug, Error, Clone, PartialEq, Eq, Serialize)]
pub enum BindError {
    /// The unit's module attribute names a module nobody declared
    #[error("Unknown module '{attempted_name}'")]
    UnknownModule {
        /// Name written in the attribute
        attempted_name: String,
        /// Location of the attribute
        location: Location,
    },
}

/// Errors raised while checking use-sites and signatures
#[derive(Debug, Error, Clone, PartialEq, Eq, Serialize)]
pub enum VisibilityError {
    /// An internal symbol was used from outside its module
    #[error(
        "{} '{symbol}' is internal to {} and cannot be accessed from {}",
        .kind.describe(),
        describe_module(.owning_module),
        describe_module(.accessing_module)
    )]
    InternalSymbolInaccessible {
        /// Qualified name of the target symbol
        symbol: String,
        /// What the target symbol is
        kind: SymbolKind,
        /// Module owning the symbol
        owning_module: Option<String>,
        /// Name of the unit containing the use-site
        accessing_unit: String,
        /// Module the accessing unit is bound to
        accessing_module: Option<String>,
        /// Location of the use-site
        location: Location,
    },

    /// A public declaration names an internal symbol in its signature
    #[error(
        "Public '{member}' exposes internal {} '{symbol}' of {} in its signature",
        .kind.describe(),
        describe_module(.module)
    )]
    InternalInPublicSignature {
        /// Qualified name of the public declaration
        member: String,
        /// Qualified name of the internal symbol it exposes
        symbol: String,
        /// What the exposed symbol is
        kind: SymbolKind,
        /// Module owning the internal symbol
        module: Option<String>,
        /// Location of the public declaration
        location: Location,
    },
}

/// Any error produced by a whole-program run
#[derive(Debug, Error, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ProgramError {
    /// Module declaration error
    #[error(transparent)]
    Registry(#[from] RegistryError),

    /// Unit binding error
    #[error(transparent)]
    Bind(#[from] BindError),

    /// Visibility error
    #[error(transparent)]
    Visibility(#[from] VisibilityError),
}

impl ProgramError {
    /// Location the error is primarily attributed to
    pub fn location(&self) -> Location {
        match self {
            ProgramError::Registry(RegistryError::DuplicateModule { second, .. }) => *second,
            ProgramError::Bind(BindError::UnknownModule { location, .. }) => *location,
            ProgramError::Visibility(VisibilityError::InternalSymbolInaccessible { location, .. })
            | ProgramError::Visibility(VisibilityError::InternalInPublicSignature { location, .. }) => {
                *location
            }
        }
    }
}
