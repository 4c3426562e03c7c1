//! `fretdesk-wizard` — the gated multi-step composition wizard.
//!
//! A finite-state controller over one owned [`fretdesk_orders::OrdreDraft`]:
//! forward navigation is gated on per-step prerequisites, all mutation goes
//! through one reducer, default taxes are applied exactly once, and
//! submission is a two-phase confirm-then-send with a single-in-flight guard.

pub mod controller;
pub mod step;

pub use controller::{Mode, Restored, Wizard, WizardAction};
pub use step::Step;
