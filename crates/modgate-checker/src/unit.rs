//! Compilation units and their module binding
//!
//! A unit opts into at most one module through a unit-level attribute. The
//! binder validates that attribute against the frozen registry. An attribute
//! naming an undeclared module is reported once and the unit is then treated
//! as belonging to no module, so the rest of the run keeps going.

use crate::alias::UseKind;
use crate::error::BindError;
use crate::registry::{ModuleId, ModuleRegistry};
use crate::span::{FileId, Location};
use crate::symbols::{Declaration, SymbolId};
use serde::{Deserialize, Serialize};

/// Identity of a compilation unit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct UnitId(pub u32);

/// The unit-level module attribute, unvalidated
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleAttr {
    /// Module name as written
    pub name: String,
    /// Location of the attribute
    pub location: Location,
}

impl ModuleAttr {
    /// Create a new module attribute
    pub fn new(name: impl Into<String>, location: Location) -> Self {
        Self {
            name: name.into(),
            location,
        }
    }
}

/// A use of a symbol at some place in a unit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UseSite {
    /// Resolved target symbol
    pub target: SymbolId,
    /// How the symbol is used
    pub kind: UseKind,
    /// Location of the use
    pub location: Location,
}

impl UseSite {
    /// Create a new use-site
    pub fn new(target: SymbolId, kind: UseKind, location: Location) -> Self {
        Self {
            target,
            kind,
            location,
        }
    }
}

/// A compilation unit as handed over by the parser
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnitSource {
    /// Unit name or path
    pub name: String,
    /// Source file of the unit
    pub file: FileId,
    /// Optional module attribute
    pub module: Option<ModuleAttr>,
    /// Declarations, in source order
    pub declarations: Vec<Declaration>,
    /// Use-sites, in source order
    pub uses: Vec<UseSite>,
}

impl UnitSource {
    /// Create a unit with no attribute, declarations or uses
    pub fn new(name: impl Into<String>, file: FileId) -> Self {
        Self {
            name: name.into(),
            file,
            module: None,
            declarations: Vec::new(),
            uses: Vec::new(),
        }
    }

    /// Attach a module attribute
    pub fn in_module(mut self, name: impl Into<String>, location: Location) -> Self {
        self.module = Some(ModuleAttr::new(name, location));
        self
    }
}

/// A unit after its module attribute has been resolved
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BoundUnit {
    /// Unit id
    pub id: UnitId,
    /// Unit name or path
    pub name: String,
    /// Source file of the unit
    pub file: FileId,
    /// Resolved module; `None` when the unit has no attribute or the
    /// attribute could not be resolved
    pub module: Option<ModuleId>,
}

/// Binds units to modules of a frozen registry
pub struct UnitBinder<'r> {
    registry: &'r ModuleRegistry,
}

impl<'r> UnitBinder<'r> {
    /// Create a binder over a frozen registry
    pub fn new(registry: &'r ModuleRegistry) -> Self {
        UnitBinder { registry }
    }

    /// Bind a unit
    ///
    /// Always returns a bound unit. When the attribute names an unknown
    /// module the error is returned alongside and the unit has no module.
    pub fn bind(&self, id: UnitId, unit: &UnitSource) -> (BoundUnit, Option<BindError>) {
        let mut error = None;

        let module = match &unit.module {
            None => None,
            Some(attr) => match self.registry.resolve(&attr.name) {
                Some(module) => Some(module),
                None => {
                    tracing::debug!(unit = %unit.name, module = %attr.name, "unknown module attribute");
                    error = Some(BindError::UnknownModule {
                        attempted_name: attr.name.clone(),
                        location: attr.location,
                    });
                    None
                }
            },
        };

        let bound = BoundUnit {
            id,
            name: unit.name.clone(),
            file: unit.file,
            module,
        };

        (bound, error)
    }
}
