//! Symbol table annotation
//!
//! Every declaration becomes a [`Symbol`] that records which module owns it
//! and how visible it is. The owner is inherited verbatim from the declaring
//! unit's resolved module (possibly none); the visibility comes from the
//! declaration's `internal` marker and is `Public` when the marker is absent.

use crate::registry::ModuleId;
use crate::span::Location;
use crate::unit::{BoundUnit, UnitId};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Declared visibility of a symbol
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    /// Visible from every unit, bound or not
    #[default]
    Public,
    /// Visible only from units bound to the owning module
    Internal,
}

impl Visibility {
    /// Visibility implied by an optional `internal` marker
    pub fn from_marker(internal: bool) -> Self {
        if internal {
            Visibility::Internal
        } else {
            Visibility::Public
        }
    }

    /// Keyword as written in source
    pub fn keyword(&self) -> &'static str {
        match self {
            Visibility::Public => "public",
            Visibility::Internal => "internal",
        }
    }
}

/// What kind of entity a symbol names
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SymbolKind {
    /// Free function
    Function,
    /// Class, interface or trait
    Class,
    /// Instance method
    Method,
    /// Static method
    StaticMethod,
    /// Instance property
    Property,
    /// Static property
    StaticProperty,
    /// Class constant
    ClassConstant,
    /// Transparent type alias
    TypeAlias,
    /// Opaque type alias
    Newtype,
}

impl SymbolKind {
    /// Whether the symbol is a type alias, transparent or opaque
    pub fn is_type_alias(&self) -> bool {
        matches!(self, SymbolKind::TypeAlias | SymbolKind::Newtype)
    }

    /// Human-readable description used in diagnostics
    pub fn describe(&self) -> &'static str {
        match self {
            SymbolKind::Function => "function",
            SymbolKind::Class => "class",
            SymbolKind::Method => "method",
            SymbolKind::StaticMethod => "static method",
            SymbolKind::Property => "property",
            SymbolKind::StaticProperty => "static property",
            SymbolKind::ClassConstant => "class constant",
            SymbolKind::TypeAlias => "type alias",
            SymbolKind::Newtype => "newtype",
        }
    }
}

/// Identity of a symbol: the declaring unit and the declaration's index in it
///
/// The id is positional, so a host driver can refer to a declaration before
/// annotation has run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SymbolId {
    /// Declaring unit
    pub unit: UnitId,
    /// Position among the unit's declarations
    pub index: u32,
}

impl SymbolId {
    /// Create a new symbol id
    pub fn new(unit: UnitId, index: u32) -> Self {
        Self { unit, index }
    }
}

impl fmt::Display for SymbolId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}.{}", self.unit.0, self.index)
    }
}

/// A declaration as handed over by the parser
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Declaration {
    /// Symbol kind
    pub kind: SymbolKind,
    /// Qualified name (`A::$x`, `f`, `Ty`)
    pub name: String,
    /// Whether the declaration carries the `internal` marker
    pub internal: bool,
    /// Location of the declaration's name
    pub location: Location,
    /// Symbols named in the declaration's signature (parameter, return,
    /// property or aliased types)
    pub signature: Vec<SymbolId>,
}

impl Declaration {
    /// Create a public declaration with an empty signature
    pub fn new(kind: SymbolKind, name: impl Into<String>, location: Location) -> Self {
        Self {
            kind,
            name: name.into(),
            internal: false,
            location,
            signature: Vec::new(),
        }
    }

    /// Mark the declaration `internal`
    pub fn internal(mut self) -> Self {
        self.internal = true;
        self
    }

    /// Add a symbol to the declaration's signature
    pub fn with_signature(mut self, symbol: SymbolId) -> Self {
        self.signature.push(symbol);
        self
    }
}

/// An annotated declaration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Symbol {
    /// Symbol id
    pub id: SymbolId,
    /// Qualified name
    pub name: String,
    /// Symbol kind
    pub kind: SymbolKind,
    /// Declared visibility, fixed for the symbol's lifetime
    pub visibility: Visibility,
    /// Owning module, inherited from the declaring unit
    pub module: Option<ModuleId>,
    /// Source location
    pub location: Location,
    /// Symbols named in the signature
    pub signature: Vec<SymbolId>,
}

impl Symbol {
    /// Whether the symbol is internal
    pub fn is_internal(&self) -> bool {
        self.visibility == Visibility::Internal
    }
}

/// Annotate one declaration of `unit`
///
/// `index` is the declaration's position in the unit and becomes part of the
/// symbol's id. The alias kind plays no role here.
pub fn annotate(decl: &Declaration, unit: &BoundUnit, index: u32) -> Symbol {
    Symbol {
        id: SymbolId::new(unit.id, index),
        name: decl.name.clone(),
        kind: decl.kind,
        visibility: Visibility::from_marker(decl.internal),
        module: unit.module,
        location: decl.location,
        signature: decl.signature.clone(),
    }
}

/// All annotated symbols of a program, grouped by declaring unit
#[derive(Debug, Clone, Default)]
pub struct SymbolTable {
    units: Vec<Vec<Symbol>>,
}

impl SymbolTable {
    /// Create an empty symbol table
    pub fn new() -> Self {
        Self::default()
    }

    /// Store the symbols of a unit
    ///
    /// Units must be inserted in `UnitId` order; any gap is filled with empty
    /// units.
    pub fn insert_unit(&mut self, unit: UnitId, symbols: Vec<Symbol>) {
        let slot = unit.0 as usize;
        if self.units.len() <= slot {
            self.units.resize_with(slot + 1, Vec::new);
        }
        self.units[slot] = symbols;
    }

    /// Look up a symbol by id
    pub fn get(&self, id: SymbolId) -> Option<&Symbol> {
        self.units
            .get(id.unit.0 as usize)
            .and_then(|symbols| symbols.get(id.index as usize))
    }

    /// Symbols declared by a unit
    pub fn symbols_of(&self, unit: UnitId) -> &[Symbol] {
        self.units
            .get(unit.0 as usize)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Iterate over every symbol, in unit then declaration order
    pub fn iter(&self) -> impl Iterator<Item = &Symbol> {
        self.units.iter().flatten()
    }

    /// Total number of symbols
    pub fn len(&self) -> usize {
        self.units.iter().map(Vec::len).sum()
    }

    /// Whether the table holds no symbols
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
