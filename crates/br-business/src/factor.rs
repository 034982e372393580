//! Independent causes that can lower a business's functionality.

use std::fmt;

/// A cause of reduced business functionality.
///
/// The display labels are the reason strings written to the causal log.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Factor {
    /// The home building's own functionality; always applied first.
    HomeComponent,
    /// Unmet infrastructure demand at the home building.
    Infrastructure,
    /// Share of employees able to reach work.
    Labor,
    /// Share of the customer base still present.
    CustomerBase,
    /// No local supplier reachable.
    LocalSuppliers,
}

impl Factor {
    pub fn label(self) -> &'static str {
        match self {
            Factor::HomeComponent  => "Home Component Functionality",
            Factor::Infrastructure => "Infrastructure",
            Factor::Labor          => "Labor",
            Factor::CustomerBase   => "Customer Base",
            Factor::LocalSuppliers => "LocalSuppliers",
        }
    }
}

impl fmt::Display for Factor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One binding constraint recorded in a business's causal history.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct CausalEntry {
    pub factor: Factor,
    /// Functionality level after the factor was applied.
    pub level:  f64,
}
