//! Signature exposure
//!
//! A public declaration may not name an internal symbol in its signature:
//! such a member would be callable from outside the module while its
//! parameter or return types are not nameable there. Internal declarations
//! may name internal symbols freely.
//!
//! Only internal symbols of the declaration's own module are reported here.
//! Naming an internal symbol of another module (or of no module) in a
//! signature is denied by the access check the driver runs over every
//! signature entry, and reported as an inaccessible use.

use crate::error::VisibilityError;
use crate::registry::ModuleRegistry;
use crate::symbols::{Symbol, SymbolTable, Visibility};

/// Validates the signatures of public declarations
#[derive(Debug, Clone, Copy)]
pub struct SignatureChecker<'r> {
    registry: &'r ModuleRegistry,
}

impl<'r> SignatureChecker<'r> {
    /// Create a signature checker
    pub fn new(registry: &'r ModuleRegistry) -> Self {
        Self { registry }
    }

    /// Check one declaration, returning one error per exposed internal symbol
    pub fn check(&self, symbol: &Symbol, symbols: &SymbolTable) -> Vec<VisibilityError> {
        if symbol.visibility != Visibility::Public {
            return Vec::new();
        }

        symbol
            .signature
            .iter()
            .filter_map(|id| symbols.get(*id))
            .filter(|referenced| {
                referenced.is_internal() && referenced.module.is_some() && referenced.module == symbol.module
            })
            .map(|referenced| VisibilityError::InternalInPublicSignature {
                member: symbol.name.clone(),
                symbol: referenced.name.clone(),
                kind: referenced.kind,
                module: self.registry.describe(referenced.module),
                location: symbol.location,
            })
            .collect()
    }
}
