//! Tax catalog, tax selection and per-tax amount computation.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use fretdesk_core::{DomainError, DomainResult, Money};

/// One tax as published by the catalog source (e.g. TVA 18%, CSS 1%).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaxDefinition {
    pub code: String,
    pub label: String,
    /// Fractional rate, e.g. `0.18` for 18%.
    pub rate: f64,
    /// Default-selection hint applied once at wizard initialization; never
    /// re-enforced afterwards (the user may deselect a mandatory tax).
    pub mandatory: bool,
}

/// Immutable set of tax definitions for the duration of a wizard session.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TaxCatalog {
    taxes: Vec<TaxDefinition>,
}

impl TaxCatalog {
    pub fn new(taxes: Vec<TaxDefinition>) -> Self {
        Self { taxes }
    }

    pub fn get(&self, code: &str) -> Option<&TaxDefinition> {
        self.taxes.iter().find(|t| t.code == code)
    }

    pub fn iter(&self) -> impl Iterator<Item = &TaxDefinition> {
        self.taxes.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.taxes.is_empty()
    }

    /// Codes flagged `mandatory`, the one-shot default selection hint.
    pub fn default_selection(&self) -> BTreeSet<String> {
        self.taxes
            .iter()
            .filter(|t| t.mandatory)
            .map(|t| t.code.clone())
            .collect()
    }
}

/// The user's tax choices for one document.
///
/// `exonerated` is only meaningful while `has_exoneration` is true; codes stay
/// in `selected` even when exonerated so the recap can show them at zero.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TaxSelection {
    pub selected: BTreeSet<String>,
    pub has_exoneration: bool,
    pub exonerated: BTreeSet<String>,
    pub reason: String,
}

impl TaxSelection {
    pub fn with_codes<I, S>(codes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            selected: codes.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    pub fn toggle(&mut self, code: &str) {
        if !self.selected.remove(code) {
            self.selected.insert(code.to_string());
        } else {
            // A deselected tax cannot stay exonerated.
            self.exonerated.remove(code);
        }
    }

    pub fn is_selected(&self, code: &str) -> bool {
        self.selected.contains(code)
    }

    pub fn set_exoneration(&mut self, enabled: bool) {
        self.has_exoneration = enabled;
        if !enabled {
            self.exonerated.clear();
            self.reason.clear();
        }
    }

    /// Mark a selected code as exonerated. Unselected codes are refused so
    /// `exonerated ⊆ selected` holds by construction.
    pub fn exonerate(&mut self, code: &str) -> DomainResult<()> {
        if !self.selected.contains(code) {
            return Err(DomainError::invariant(format!(
                "cannot exonerate unselected tax {code}"
            )));
        }
        self.exonerated.insert(code.to_string());
        Ok(())
    }

    pub fn is_exonerated(&self, code: &str) -> bool {
        self.has_exoneration && self.exonerated.contains(code)
    }

    /// Submission-time check: an exoneration without a recorded reason is
    /// blocked here, before anything reaches the network.
    pub fn validate_for_submission(&self) -> DomainResult<()> {
        if self.has_exoneration && self.reason.trim().is_empty() {
            return Err(DomainError::validation(
                "exoneration requires a reason before submission",
            ));
        }
        Ok(())
    }
}

/// Per-tax amounts plus their sum.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaxBreakdown {
    pub per_tax: BTreeMap<String, Money>,
    pub total: Money,
}

impl TaxBreakdown {
    pub fn amount(&self, code: &str) -> Money {
        self.per_tax.get(code).copied().unwrap_or(Money::ZERO)
    }
}

/// Compute per-tax amounts for `base` under `selection`.
///
/// Exonerated codes are forced to zero but remain present in the breakdown.
/// Selected codes absent from the catalog (stale draft) contribute nothing
/// and are skipped. Pure and deterministic.
pub fn compute_taxes(base: Money, catalog: &TaxCatalog, selection: &TaxSelection) -> TaxBreakdown {
    let mut per_tax = BTreeMap::new();
    let mut total = Money::ZERO;

    for code in &selection.selected {
        let Some(tax) = catalog.get(code) else {
            continue;
        };
        let amount = if selection.is_exonerated(code) {
            Money::ZERO
        } else {
            base.apply_rate(tax.rate)
        };
        total = total + amount;
        per_tax.insert(code.clone(), amount);
    }

    TaxBreakdown { per_tax, total }
}
