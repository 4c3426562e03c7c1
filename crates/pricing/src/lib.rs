//! `fretdesk-pricing` — the financial pipeline of a work order.
//!
//! Pure, deterministic functions over current state: discount (remise) on the
//! HT base, per-tax amounts under a user-editable selection with partial
//! exoneration, and the composed HT → remise → taxes → TTC summary.
//!
//! Nothing here performs IO; the tax catalog is fetched elsewhere and passed
//! in by value.

pub mod discount;
pub mod summary;
pub mod tax;

pub use discount::{compute_discount, Remise};
pub use summary::{compose, FinancialSummary};
pub use tax::{compute_taxes, TaxBreakdown, TaxCatalog, TaxDefinition, TaxSelection};
