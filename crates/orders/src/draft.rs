//! The single owned in-progress document value.
//!
//! Every mutable field the wizard touches lives here, so persisting a draft
//! is one serialize and restoring one deserialize. Mutation goes through the
//! wizard's reducer, never ad hoc setters scattered across the UI.

use serde::{Deserialize, Serialize};

use fretdesk_core::{ClientId, Money};
use fretdesk_pricing::{compose, FinancialSummary, Remise, TaxCatalog, TaxSelection};

use crate::category::Category;
use crate::line_items::LineItems;

/// The id/name pair the core holds for the billed client, never the full
/// client record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientRef {
    pub id: ClientId,
    pub nom: String,
}

fn default_step() -> u8 {
    1
}

/// A full snapshot of an in-progress work order.
///
/// The category is carried by `line_items`' tag rather than a separate field,
/// so category and detail shape can never disagree. `current_step` is the
/// wizard position as persisted; the wizard re-derives (clamps) it on
/// restore.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrdreDraft {
    #[serde(default)]
    pub client: Option<ClientRef>,
    #[serde(default)]
    pub notes: String,
    #[serde(default = "default_step")]
    pub current_step: u8,
    #[serde(default)]
    pub line_items: Option<LineItems>,
    #[serde(default)]
    pub remise: Remise,
    #[serde(default)]
    pub taxes: TaxSelection,
    /// One-shot guard: set once the catalog's default selection has been
    /// applied; never reset, even across catalog refetches or restores.
    #[serde(default)]
    pub taxes_initialized: bool,
}

impl OrdreDraft {
    pub fn new() -> Self {
        Self {
            client: None,
            notes: String::new(),
            current_step: 1,
            line_items: None,
            remise: Remise::Aucune,
            taxes: TaxSelection::default(),
            taxes_initialized: false,
        }
    }

    pub fn category(&self) -> Option<Category> {
        self.line_items.as_ref().map(LineItems::category)
    }

    pub fn subtotal(&self) -> Money {
        self.line_items
            .as_ref()
            .map(LineItems::subtotal)
            .unwrap_or(Money::ZERO)
    }

    pub fn is_detail_complete(&self) -> bool {
        self.line_items
            .as_ref()
            .is_some_and(LineItems::is_complete)
    }

    /// Re-evaluate the financial summary from current values. No caching.
    pub fn summary(&self, catalog: &TaxCatalog) -> FinancialSummary {
        compose(self.subtotal(), &self.remise, catalog, &self.taxes)
    }
}

impl Default for OrdreDraft {
    fn default() -> Self {
        Self::new()
    }
}
