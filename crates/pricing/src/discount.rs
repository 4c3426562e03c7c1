//! Remise (discount) computation on the HT base.

use serde::{Deserialize, Serialize};

use fretdesk_core::Money;

/// Discount specification. The computed amount is never stored: it is
/// recomputed from the current base on every compose, so a stale discount
/// can never exceed a shrunken base.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Remise {
    #[default]
    Aucune,
    /// Percentage of the HT base, clamped to `[0, 100]`.
    Pourcentage { taux: f64 },
    /// Fixed amount, capped at the HT base.
    Fixe { montant: Money },
}

impl Remise {
    pub fn is_none(&self) -> bool {
        matches!(self, Remise::Aucune)
    }
}

/// Compute the monetary reduction for `base`. Always in `[0, base]`.
pub fn compute_discount(base: Money, remise: &Remise) -> Money {
    match remise {
        Remise::Aucune => Money::ZERO,
        Remise::Pourcentage { taux } => base.percent(*taux),
        Remise::Fixe { montant } => (*montant).min(base),
    }
}
