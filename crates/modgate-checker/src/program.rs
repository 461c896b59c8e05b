//! Whole-program driver
//!
//! Runs the phases in order and collects every error instead of stopping at
//! the first one:
//!
//! 1. Registry: module declarations are collected sequentially, duplicates
//!    reported, then the registry is frozen.
//! 2. Binding: each unit is bound to its module and its declarations are
//!    annotated. Units are independent, so this runs on a worker pool.
//! 3. Checking: each unit's signatures and use-sites are checked against the
//!    frozen registry and symbol table, again per unit. A symbol named in a
//!    signature is checked like a type hint at the declaration.
//!
//! Results are merged in unit order, so the error list does not depend on
//! thread scheduling.

use crate::alias::{AliasAdapter, UseKind};
use crate::config::CheckerConfig;
use crate::error::{BindError, ProgramError, VisibilityError};
use crate::registry::{ModuleDecl, ModuleRegistry, RegistryBuilder};
use crate::signature::SignatureChecker;
use crate::symbols::{annotate, Symbol, SymbolTable};
use crate::unit::{BoundUnit, UnitBinder, UnitId, UnitSource, UseSite};
use crate::visibility::{AccessEvent, NoModulePolicy, VisibilityChecker};

/// Everything a run needs from the parser
#[derive(Debug, Clone, Default)]
pub struct ProgramInput {
    /// Module declarations, in source order
    pub modules: Vec<ModuleDecl>,
    /// Compilation units; a unit's position is its `UnitId`
    pub units: Vec<UnitSource>,
}

/// Result of a run
#[derive(Debug, Clone)]
pub struct CheckOutcome {
    /// Frozen module registry
    pub registry: ModuleRegistry,
    /// Bound units, indexed by `UnitId`
    pub units: Vec<BoundUnit>,
    /// Annotated symbols
    pub symbols: SymbolTable,
    /// Every error found, in deterministic order
    pub errors: Vec<ProgramError>,
    policy: NoModulePolicy,
}

impl CheckOutcome {
    /// Whether the run found any error
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Number of errors found
    pub fn error_count(&self) -> usize {
        self.errors.len()
    }

    /// Get a bound unit
    pub fn unit(&self, id: UnitId) -> Option<&BoundUnit> {
        self.units.get(id.0 as usize)
    }

    /// Check an additional use-site against the finished run
    ///
    /// Returns `None` when the unit or the target symbol does not exist.
    pub fn check_use(&self, unit: UnitId, site: &UseSite) -> Option<Result<(), VisibilityError>> {
        let unit = self.unit(unit)?;
        let target = self.symbols.get(site.target)?;
        let adapter = AliasAdapter::new(VisibilityChecker::new(&self.registry, self.policy));
        Some(adapter.check_use(&AccessEvent::new(unit, target, site.location), site.kind))
    }
}

/// Runs the checking phases
#[derive(Debug, Clone, Default)]
pub struct Checker {
    config: CheckerConfig,
}

impl Checker {
    /// Create a checker with the given configuration
    pub fn new(config: CheckerConfig) -> Self {
        Checker { config }
    }

    /// Check a whole program
    pub fn run(&self, input: &ProgramInput) -> CheckOutcome {
        let mut errors: Vec<ProgramError> = Vec::new();

        let registry = Self::build_registry(&input.modules, &mut errors);

        let binder = UnitBinder::new(&registry);
        let bound = self.par_map(&input.units, |index, source| {
            let (unit, error) = binder.bind(UnitId(index as u32), source);
            let symbols: Vec<Symbol> = source
                .declarations
                .iter()
                .enumerate()
                .map(|(i, decl)| annotate(decl, &unit, i as u32))
                .collect();
            (unit, error, symbols)
        });

        let mut units = Vec::with_capacity(bound.len());
        let mut bind_errors: Vec<Option<BindError>> = Vec::with_capacity(bound.len());
        let mut symbols = SymbolTable::new();
        for (unit, error, unit_symbols) in bound {
            symbols.insert_unit(unit.id, unit_symbols);
            bind_errors.push(error);
            units.push(unit);
        }
        tracing::debug!(units = units.len(), symbols = symbols.len(), "units bound");

        let adapter = AliasAdapter::new(VisibilityChecker::new(&registry, self.config.no_module_policy));
        let signatures = self
            .config
            .signature_exposure
            .then(|| SignatureChecker::new(&registry));

        let checked = self.par_map(&units, |index, unit| {
            Self::check_unit(unit, &input.units[index], &symbols, &adapter, signatures.as_ref())
        });

        for (bind_error, unit_errors) in bind_errors.into_iter().zip(checked) {
            errors.extend(bind_error.map(ProgramError::from));
            errors.extend(unit_errors.into_iter().map(ProgramError::from));
        }
        tracing::debug!(errors = errors.len(), "check finished");

        CheckOutcome {
            registry,
            units,
            symbols,
            errors,
            policy: self.config.no_module_policy,
        }
    }

    fn build_registry(modules: &[ModuleDecl], errors: &mut Vec<ProgramError>) -> ModuleRegistry {
        let mut builder = RegistryBuilder::new();
        for decl in modules {
            if let Err(err) = builder.declare(decl.name.clone(), decl.location) {
                errors.push(err.into());
            }
        }
        builder.freeze()
    }

    fn check_unit(
        unit: &BoundUnit,
        source: &UnitSource,
        symbols: &SymbolTable,
        adapter: &AliasAdapter<'_>,
        signatures: Option<&SignatureChecker<'_>>,
    ) -> Vec<VisibilityError> {
        let mut errors = Vec::new();

        for symbol in symbols.symbols_of(unit.id) {
            if let Some(signatures) = signatures {
                errors.extend(signatures.check(symbol, symbols));
            }

            // Naming a type in a signature is a type hint written at the declaration
            for id in &symbol.signature {
                let Some(referenced) = symbols.get(*id) else {
                    tracing::warn!(unit = %unit.name, target = %id, "signature names an unknown symbol, skipped");
                    continue;
                };
                let event = AccessEvent::new(unit, referenced, symbol.location);
                if let Err(err) = adapter.check_use(&event, UseKind::TypeHint) {
                    errors.push(err);
                }
            }
        }

        for site in &source.uses {
            let Some(target) = symbols.get(site.target) else {
                tracing::warn!(unit = %unit.name, target = %site.target, "use-site names an unknown symbol, skipped");
                continue;
            };
            let event = AccessEvent::new(unit, target, site.location);
            if let Err(err) = adapter.check_use(&event, site.kind) {
                errors.push(err);
            }
        }

        errors
    }

    /// Map `f` over `items` on scoped worker threads, preserving order
    fn par_map<T, R, F>(&self, items: &[T], f: F) -> Vec<R>
    where
        T: Sync,
        R: Send,
        F: Fn(usize, &T) -> R + Sync,
    {
        let workers = self.config.worker_count().min(items.len());
        if workers <= 1 {
            return items.iter().enumerate().map(|(i, item)| f(i, item)).collect();
        }

        let chunk_size = items.len().div_ceil(workers);
        let f = &f;

        crossbeam::thread::scope(|scope| {
            let handles: Vec<_> = items
                .chunks(chunk_size)
                .enumerate()
                .map(|(chunk_index, chunk)| {
                    scope.spawn(move |_| {
                        chunk
                            .iter()
                            .enumerate()
                            .map(|(i, item)| f(chunk_index * chunk_size + i, item))
                            .collect::<Vec<R>>()
                    })
                })
                .collect();

            handles
                .into_iter()
                .flat_map(|handle| handle.join().unwrap_or_else(|panic| std::panic::resume_unwind(panic)))
                .collect::<Vec<R>>()
        })
        .unwrap_or_else(|panic| std::panic::resume_unwind(panic))
    }
}
