//! Visibility checking
//!
//! Decides whether a use of a symbol from some unit is allowed. The decision
//! only depends on the symbol's visibility, its owning module and the
//! accessing unit's module:
//!
//! | visibility | owner     | accessor          | result |
//! |------------|-----------|-------------------|--------|
//! | public     | any       | any               | allow  |
//! | internal   | `Some(m)` | `Some(m)`         | allow  |
//! | internal   | `Some(m)` | `Some(n)`, n != m | deny   |
//! | internal   | `Some(m)` | `None`            | deny   |
//! | internal   | `None`    | any               | deny   |
//!
//! The last row can be relaxed with [`NoModulePolicy::SameBucket`].

use crate::error::VisibilityError;
use crate::registry::{ModuleId, ModuleRegistry};
use crate::span::Location;
use crate::symbols::{Symbol, Visibility};
use crate::unit::BoundUnit;
use serde::{Deserialize, Serialize};

/// How internal symbols owned by no module are treated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NoModulePolicy {
    /// Never reachable
    #[default]
    Deny,
    /// Reachable from other units that have no module either
    SameBucket,
}

/// A single use of a symbol, evaluated and dropped
#[derive(Debug, Clone, Copy)]
pub struct AccessEvent<'a> {
    /// Unit containing the use
    pub unit: &'a BoundUnit,
    /// Target symbol
    pub target: &'a Symbol,
    /// Location of the use
    pub location: Location,
}

impl<'a> AccessEvent<'a> {
    /// Create a new access event
    pub fn new(unit: &'a BoundUnit, target: &'a Symbol, location: Location) -> Self {
        Self {
            unit,
            target,
            location,
        }
    }
}

/// The visibility table
pub fn is_accessible(
    visibility: Visibility,
    owner: Option<ModuleId>,
    accessor: Option<ModuleId>,
    policy: NoModulePolicy,
) -> bool {
    match (visibility, owner, accessor) {
        (Visibility::Public, _, _) => true,
        (Visibility::Internal, Some(owner), Some(accessor)) => owner == accessor,
        (Visibility::Internal, Some(_), None) => false,
        (Visibility::Internal, None, accessor) => {
            policy == NoModulePolicy::SameBucket && accessor.is_none()
        }
    }
}

/// Checks access events against the registry's modules
#[derive(Debug, Clone, Copy)]
pub struct VisibilityChecker<'r> {
    registry: &'r ModuleRegistry,
    policy: NoModulePolicy,
}

impl<'r> VisibilityChecker<'r> {
    /// Create a checker
    pub fn new(registry: &'r ModuleRegistry, policy: NoModulePolicy) -> Self {
        Self { registry, policy }
    }

    /// Check one access event
    pub fn check(&self, event: &AccessEvent<'_>) -> Result<(), VisibilityError> {
        let target = event.target;
        let allowed = is_accessible(target.visibility, target.module, event.unit.module, self.policy);

        tracing::trace!(
            symbol = %target.name,
            visibility = target.visibility.keyword(),
            unit = %event.unit.name,
            allowed,
            "visibility check"
        );

        if allowed {
            return Ok(());
        }

        Err(VisibilityError::InternalSymbolInaccessible {
            symbol: target.name.clone(),
            kind: target.kind,
            owning_module: self.registry.describe(target.module),
            accessing_unit: event.unit.name.clone(),
            accessing_module: self.registry.describe(event.unit.module),
            location: event.location,
        })
    }
}
