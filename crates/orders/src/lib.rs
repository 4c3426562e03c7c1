//! `fretdesk-orders` — the work-order document model.
//!
//! Three mutually exclusive line-item shapes (container operations, bulk
//! lots, independent services) behind one tagged union, each exposing the
//! same derived HT subtotal, plus the single owned [`OrdreDraft`] value the
//! wizard mutates and the draft store persists.

pub mod category;
pub mod draft;
pub mod line_items;

pub use category::Category;
pub use draft::{ClientRef, OrdreDraft};
pub use line_items::{
    BulkLotSet, Conteneur, ContainerSet, Direction, IndependentServiceSet, LineItems, Lot,
    OperationLigne, Prestation, TailleConteneur, TypeOperation,
};
