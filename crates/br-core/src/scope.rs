use std::fmt;

use crate::ComponentId;

/// Which part of the system a supply/demand/consumption total covers.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum Scope {
    #[default]
    All,
    /// Only businesses hosted by these components.
    Components(Vec<ComponentId>),
}

impl Scope {
    pub fn includes(&self, component: ComponentId) -> bool {
        match self {
            Scope::All => true,
            Scope::Components(ids) => ids.contains(&component),
        }
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scope::All => f.write_str("All"),
            Scope::Components(ids) => write!(f, "{} components", ids.len()),
        }
    }
}
