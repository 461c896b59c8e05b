//! Type-alias uses
//!
//! A type alias has two surfaces. Its name is an ordinary symbol: naming the
//! alias in a signature, a variable declaration or a generic argument is
//! checked like any other use. Casting a value to the alias works on the
//! underlying representation instead and is never gated by modules.

use crate::error::VisibilityError;
use crate::visibility::{AccessEvent, VisibilityChecker};
use serde::{Deserialize, Serialize};

/// How a use-site refers to its target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum UseKind {
    /// Function or method call
    Call,
    /// Read of a property or constant
    Read,
    /// Write to a property
    Write,
    /// Type hint naming the symbol (parameter, return, property or local)
    TypeHint,
    /// Instantiation of a class
    New,
    /// Value conversion (`$v as T`)
    Cast,
}

impl UseKind {
    /// Whether the use names the target
    ///
    /// Everything except a cast does. A cast to a class still names the class;
    /// only a cast to an alias goes to the underlying type.
    pub fn names_target(&self) -> bool {
        !matches!(self, UseKind::Cast)
    }
}

/// Routes use-sites to the visibility checker or around it
#[derive(Debug, Clone, Copy)]
pub struct AliasAdapter<'r> {
    checker: VisibilityChecker<'r>,
}

impl<'r> AliasAdapter<'r> {
    /// Wrap a visibility checker
    pub fn new(checker: VisibilityChecker<'r>) -> Self {
        Self { checker }
    }

    /// Check a use of `event.target`
    pub fn check_use(&self, event: &AccessEvent<'_>, kind: UseKind) -> Result<(), VisibilityError> {
        if !kind.names_target() && event.target.kind.is_type_alias() {
            tracing::trace!(
                alias = %event.target.name,
                unit = %event.unit.name,
                "cast to alias representation, not gated"
            );
            return Ok(());
        }

        self.checker.check(event)
    }
}
