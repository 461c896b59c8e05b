//! Modgate module visibility checker
//!
//! Decides which module owns every declared symbol and whether a use-site
//! may see it.
//!
//! This crate provides:
//! - A two-phase module registry with exact, case-sensitive lookup
//! - Binding of compilation units to modules
//! - Symbol annotation (owning module + `public`/`internal` visibility)
//! - The visibility checker and its type-alias adapter
//! - Signature exposure checking for public declarations
//! - A whole-program driver that collects every error
//! - codespan-based diagnostics and TOML configuration
//!
//! # Usage
//!
//! ```ignore
//! use modgate_checker::{Checker, CheckerConfig, ProgramInput};
//!
//! let input: ProgramInput = load_from_parser();
//! let outcome = Checker::new(CheckerConfig::default()).run(&input);
//! for error in &outcome.errors {
//!     let diag = Diagnostic::from_error(error);
//!     diag.emit(&mut stderr, &files)?;
//! }
//! ```

#![warn(missing_docs)]
#![warn(rust_2018_idioms)]

pub mod span;
pub mod error;
pub mod registry;
pub mod unit;
pub mod symbols;
pub mod visibility;
pub mod alias;
pub mod signature;
pub mod program;
pub mod config;
pub mod diagnostic;

// Re-export main types
pub use span::{FileId, Location, Span};
pub use error::{BindError, ProgramError, RegistryError, VisibilityError};
pub use registry::{ModuleDecl, ModuleId, ModuleRegistry, RegistryBuilder};
pub use unit::{BoundUnit, ModuleAttr, UnitBinder, UnitId, UnitSource, UseSite};
pub use symbols::{annotate, Declaration, Symbol, SymbolId, SymbolKind, SymbolTable, Visibility};
pub use visibility::{is_accessible, AccessEvent, NoModulePolicy, VisibilityChecker};
pub use alias::{AliasAdapter, UseKind};
pub use signature::SignatureChecker;
pub use program::{CheckOutcome, Checker, ProgramInput};
pub use config::{CheckerConfig, ConfigError};
pub use diagnostic::{create_files, error_code, Diagnostic, ErrorCode, JsonDiagnostic, SimpleFiles};
