//! Composition of the financial summary: HT → remise → taxes → TTC.

use std::collections::BTreeMap;

use fretdesk_core::Money;

use crate::discount::{compute_discount, Remise};
use crate::tax::{compute_taxes, TaxCatalog, TaxSelection};

/// Derived totals for one document. Never stored: recomputed from current
/// model values on every evaluation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FinancialSummary {
    pub montant_ht: Money,
    pub remise_montant: Money,
    pub per_tax: BTreeMap<String, Money>,
    pub montant_ttc: Money,
}

impl FinancialSummary {
    /// HT after discount, the base taxes were computed on.
    pub fn net_commercial(&self) -> Money {
        self.montant_ht.saturating_sub(self.remise_montant)
    }

    pub fn tax_amount(&self, code: &str) -> Money {
        self.per_tax.get(code).copied().unwrap_or(Money::ZERO)
    }

    pub fn total_taxes(&self) -> Money {
        self.per_tax.values().copied().sum()
    }
}

/// Compose the summary for a line-item subtotal.
///
/// The ordering (discount applied before taxes) is a fixed business rule,
/// not a caller choice. Stateless: identical inputs yield identical output.
pub fn compose(
    montant_ht: Money,
    remise: &Remise,
    catalog: &TaxCatalog,
    selection: &TaxSelection,
) -> FinancialSummary {
    let remise_montant = compute_discount(montant_ht, remise);
    let net = montant_ht.saturating_sub(remise_montant);
    let taxes = compute_taxes(net, catalog, selection);

    FinancialSummary {
        montant_ht,
        remise_montant,
        montant_ttc: net + taxes.total,
        per_tax: taxes.per_tax,
    }
}
