//! Module registry
//!
//! The registry is built in two phases. A [`RegistryBuilder`] collects every
//! module declaration of the program, rejecting exact-name duplicates. Once
//! all declarations have been seen it is frozen into a [`ModuleRegistry`],
//! which is read-only and shared by reference with every later phase.
//!
//! Name lookup is exact: `A` and `a` are two unrelated modules.

use crate::error::RegistryError;
use crate::span::Location;
use rustc_hash::FxHashMap;
use serde::Serialize;

/// Identity of a declared module
///
/// Ids are handed out in declaration order. Since each exact name maps to
/// exactly one id, comparing ids is comparing names byte for byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct ModuleId(pub u32);

/// A module declaration as seen by the registry
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModuleDecl {
    /// Module name, compared exactly
    pub name: String,
    /// Location of the declaring statement
    pub location: Location,
}

impl ModuleDecl {
    /// Create a new module declaration
    pub fn new(name: impl Into<String>, location: Location) -> Self {
        Self {
            name: name.into(),
            location,
        }
    }
}

/// Mutable registry used while module declarations are being collected
#[derive(Debug, Default)]
pub struct RegistryBuilder {
    modules: Vec<ModuleDecl>,
    by_name: FxHashMap<String, ModuleId>,
}

impl RegistryBuilder {
    /// Create an empty builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a module
    ///
    /// A second declaration of the same exact name is rejected and the first
    /// declaration stays in the registry.
    pub fn declare(&mut self, name: impl Into<String>, location: Location) -> Result<ModuleId, RegistryError> {
        let name = name.into();

        if let Some(&existing) = self.by_name.get(&name) {
            return Err(RegistryError::DuplicateModule {
                first: self.modules[existing.0 as usize].location,
                second: location,
                name,
            });
        }

        let id = ModuleId(self.modules.len() as u32);
        self.by_name.insert(name.clone(), id);
        self.modules.push(ModuleDecl { name, location });
        Ok(id)
    }

    /// Number of modules declared so far
    pub fn len(&self) -> usize {
        self.modules.len()
    }

    /// Whether no module has been declared yet
    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }

    /// Finish the declaration phase
    pub fn freeze(self) -> ModuleRegistry {
        tracing::debug!(modules = self.modules.len(), "module registry frozen");
        ModuleRegistry {
            modules: self.modules,
            by_name: self.by_name,
        }
    }
}

/// Read-only set of declared modules
#[derive(Debug, Clone, Default)]
pub struct ModuleRegistry {
    modules: Vec<ModuleDecl>,
    by_name: FxHashMap<String, ModuleId>,
}

impl ModuleRegistry {
    /// Look up a module by exact, case-sensitive name
    pub fn resolve(&self, name: &str) -> Option<ModuleId> {
        self.by_name.get(name).copied()
    }

    /// Get a module's declaration
    pub fn get(&self, id: ModuleId) -> Option<&ModuleDecl> {
        self.modules.get(id.0 as usize)
    }

    /// Get a module's name
    pub fn name(&self, id: ModuleId) -> Option<&str> {
        self.get(id).map(|decl| decl.name.as_str())
    }

    /// Name of an optional module, owned, for error payloads
    pub fn describe(&self, id: Option<ModuleId>) -> Option<String> {
        id.and_then(|id| self.name(id)).map(str::to_string)
    }

    /// Number of declared modules
    pub fn len(&self) -> usize {
        self.modules.len()
    }

    /// Whether the registry is empty
    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }

    /// Iterate over modules in declaration order
    pub fn iter(&self) -> impl Iterator<Item = (ModuleId, &ModuleDecl)> {
        self.modules
            .iter()
            .enumerate()
            .map(|(i, decl)| (ModuleId(i as u32), decl))
    }
}
