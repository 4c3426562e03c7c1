//! Document category: which line-item shape the order carries.

use serde::{Deserialize, Serialize};

/// The three kinds of work orders. Immutable once step 1 is confirmed for a
/// new document; frozen entirely when editing an existing one.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Conteneurs,
    Conventionnel,
    OperationsIndependantes,
}

impl Category {
    /// Wire tag used by the remote API's `type_document` field.
    pub fn as_str(self) -> &'static str {
        match self {
            Category::Conteneurs => "conteneurs",
            Category::Conventionnel => "conventionnel",
            Category::OperationsIndependantes => "operations_independantes",
        }
    }
}

impl core::fmt::Display for Category {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}
