//! The wizard controller: gated navigation, reducer-style mutation, one-shot
//! tax initialization and the two-phase submission gate.

use fretdesk_core::{DomainError, DomainResult};
use fretdesk_orders::{
    Category, ClientRef, Conteneur, LineItems, Lot, OrdreDraft, Prestation,
};
use fretdesk_pricing::{FinancialSummary, Remise, TaxCatalog};

use crate::step::Step;

/// Whether the wizard creates a new order or edits a committed one.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Mode {
    Creation,
    Edition,
}

/// Every mutation of the draft goes through one of these, dispatched by
/// [`Wizard::apply`]. No ad hoc field setters.
#[derive(Debug, Clone, PartialEq)]
pub enum WizardAction {
    ChooseCategory(Category),
    SelectClient(ClientRef),
    SetNotes(String),
    /// Replace the whole category detail (the step-3 form synced back in).
    ReplaceDetail(LineItems),
    AddConteneur(Conteneur),
    AddLot(Lot),
    AddPrestation(Prestation),
    SetRemise(Remise),
    ToggleTax(String),
    SetExoneration(bool),
    ExonerateTax(String),
    SetExonerationReason(String),
}

/// Result of rebuilding a wizard from a persisted draft.
#[derive(Debug)]
pub struct Restored {
    pub wizard: Wizard,
    /// True when the persisted tax selection was empty and the catalog
    /// defaults were substituted. Surfaced so the caller can show a notice
    /// instead of silently changing what the user saved.
    pub defaults_substituted: bool,
}

/// The wizard instance owning the in-progress document.
#[derive(Debug, Clone)]
pub struct Wizard {
    mode: Mode,
    draft: OrdreDraft,
    catalog: TaxCatalog,
    confirmed: bool,
    submission_in_flight: bool,
}

impl Wizard {
    /// Fresh create-flow wizard, starting at the category step.
    pub fn new_creation() -> Self {
        Self {
            mode: Mode::Creation,
            draft: OrdreDraft::new(),
            catalog: TaxCatalog::default(),
            confirmed: false,
            submission_in_flight: false,
        }
    }

    /// Edit-flow wizard over a committed document. The category is frozen
    /// and the wizard starts at the client step.
    pub fn new_edition(mut existing: OrdreDraft) -> Self {
        existing.current_step = Step::Client.number();
        Self {
            mode: Mode::Edition,
            draft: existing,
            catalog: TaxCatalog::default(),
            confirmed: false,
            submission_in_flight: false,
        }
    }

    /// Rebuild a wizard from a persisted draft snapshot.
    ///
    /// The persisted step is clamped to the furthest step whose
    /// prerequisites still hold, and an empty persisted tax selection falls
    /// back to the catalog defaults, reported to the caller.
    pub fn restore(mode: Mode, mut snapshot: OrdreDraft, catalog: TaxCatalog) -> Restored {
        let mut defaults_substituted = false;
        if snapshot.taxes.selected.is_empty() && !catalog.is_empty() {
            snapshot.taxes.selected = catalog.default_selection();
            snapshot.taxes_initialized = true;
            defaults_substituted = true;
        } else if !snapshot.taxes.selected.is_empty() {
            // A saved selection counts as initialized even when an older
            // payload lacks the flag; a later refetch must not overwrite it.
            snapshot.taxes_initialized = true;
        }

        let mut wizard = Self {
            mode,
            draft: snapshot,
            catalog,
            confirmed: false,
            submission_in_flight: false,
        };

        let persisted = Step::from_number(wizard.draft.current_step)
            .unwrap_or(Step::Categorie);
        let mut reachable = wizard.first_step();
        for step in wizard.first_step().span_to(persisted) {
            if wizard.can_proceed(step).is_err() {
                break;
            }
            reachable = step;
        }
        wizard.draft.current_step = reachable.max(wizard.first_step()).number();

        Restored {
            wizard,
            defaults_substituted,
        }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn draft(&self) -> &OrdreDraft {
        &self.draft
    }

    /// Consume the wizard, yielding the owned draft (for persistence).
    pub fn into_draft(self) -> OrdreDraft {
        self.draft
    }

    pub fn catalog(&self) -> &TaxCatalog {
        &self.catalog
    }

    pub fn current_step(&self) -> Step {
        Step::from_number(self.draft.current_step).unwrap_or(self.first_step())
    }

    fn first_step(&self) -> Step {
        match self.mode {
            Mode::Creation => Step::Categorie,
            Mode::Edition => Step::Client,
        }
    }

    /// Install the session tax catalog. The catalog's mandatory codes are
    /// applied as the default selection exactly once per document; refetches
    /// never re-apply them, and a deliberate deselection sticks.
    pub fn catalog_loaded(&mut self, catalog: TaxCatalog) {
        if !self.draft.taxes_initialized && !catalog.is_empty() {
            self.draft.taxes.selected = catalog.default_selection();
            self.draft.taxes_initialized = true;
        }
        self.catalog = catalog;
    }

    /// Prerequisite for *entering* `step`, with the specific human-readable
    /// reason when unmet.
    pub fn can_proceed(&self, step: Step) -> DomainResult<()> {
        match step {
            Step::Categorie => Ok(()),
            Step::Client => {
                if self.mode == Mode::Edition || self.draft.category().is_some() {
                    Ok(())
                } else {
                    Err(DomainError::validation("choose a document category"))
                }
            }
            Step::Details => {
                if self.draft.client.is_some() {
                    Ok(())
                } else {
                    Err(DomainError::validation("select a client"))
                }
            }
            Step::Recapitulatif => match &self.draft.line_items {
                None => Err(DomainError::validation("choose a document category")),
                Some(items) if !items.is_complete() => {
                    Err(DomainError::validation(items.completeness_requirement()))
                }
                Some(_) => Ok(()),
            },
        }
    }

    /// Navigate to `target`. Backward moves always succeed; a forward move
    /// (including direct step-indicator jumps) checks every intermediate
    /// prerequisite in order and reports the first unmet one.
    pub fn goto(&mut self, target: Step) -> DomainResult<()> {
        let current = self.current_step();
        if target < self.first_step() {
            return Err(DomainError::invariant(
                "the category step is not reachable when editing",
            ));
        }
        if target > current {
            for step in current.span_to(target) {
                self.can_proceed(step)
                    .map_err(|e| annotate_step(step, e))?;
            }
        }
        self.draft.current_step = target.number();
        self.confirmed = false;
        Ok(())
    }

    pub fn next(&mut self) -> DomainResult<()> {
        match self.current_step().next() {
            Some(step) => self.goto(step),
            None => Err(DomainError::invariant("already on the last step")),
        }
    }

    pub fn previous(&mut self) -> DomainResult<()> {
        let first = self.first_step();
        match self.current_step().previous() {
            Some(step) if step >= first => self.goto(step),
            _ => Err(DomainError::invariant("already on the first step")),
        }
    }

    /// The reducer: apply one action to the owned draft. Any successful edit
    /// invalidates a previous review confirmation.
    pub fn apply(&mut self, action: WizardAction) -> DomainResult<()> {
        match action {
            WizardAction::ChooseCategory(category) => self.choose_category(category)?,
            WizardAction::SelectClient(client) => {
                self.draft.client = Some(client);
            }
            WizardAction::SetNotes(notes) => {
                self.draft.notes = notes;
            }
            WizardAction::ReplaceDetail(items) => {
                let current = self.draft.category().ok_or_else(|| {
                    DomainError::validation("choose a document category first")
                })?;
                if items.category() != current {
                    return Err(DomainError::invariant(
                        "detail shape does not match the document category",
                    ));
                }
                self.draft.line_items = Some(items);
            }
            WizardAction::AddConteneur(conteneur) => {
                match self.draft.line_items.as_mut() {
                    Some(LineItems::Conteneurs(set)) => set.conteneurs.push(conteneur),
                    _ => {
                        return Err(DomainError::invariant(
                            "containers only belong to a container order",
                        ))
                    }
                }
            }
            WizardAction::AddLot(lot) => match self.draft.line_items.as_mut() {
                Some(LineItems::Conventionnel(set)) => set.lots.push(lot),
                _ => {
                    return Err(DomainError::invariant(
                        "lots only belong to a conventional order",
                    ))
                }
            },
            WizardAction::AddPrestation(prestation) => {
                match self.draft.line_items.as_mut() {
                    Some(LineItems::OperationsIndependantes(set)) => {
                        set.prestations.push(prestation)
                    }
                    _ => {
                        return Err(DomainError::invariant(
                            "services only belong to an independent-operations order",
                        ))
                    }
                }
            }
            WizardAction::SetRemise(remise) => {
                self.draft.remise = remise;
            }
            WizardAction::ToggleTax(code) => {
                if !self.draft.taxes.is_selected(&code) && self.catalog.get(&code).is_none() {
                    return Err(DomainError::validation(format!(
                        "unknown tax code {code}"
                    )));
                }
                self.draft.taxes.toggle(&code);
            }
            WizardAction::SetExoneration(enabled) => {
                self.draft.taxes.set_exoneration(enabled);
            }
            WizardAction::ExonerateTax(code) => {
                if !self.draft.taxes.has_exoneration {
                    return Err(DomainError::invariant(
                        "enable exoneration before marking taxes",
                    ));
                }
                self.draft.taxes.exonerate(&code)?;
            }
            WizardAction::SetExonerationReason(reason) => {
                self.draft.taxes.reason = reason;
            }
        }
        self.confirmed = false;
        Ok(())
    }

    fn choose_category(&mut self, category: Category) -> DomainResult<()> {
        if self.mode == Mode::Edition {
            return Err(DomainError::invariant(
                "the category is fixed when editing an existing order",
            ));
        }
        if self.draft.category() == Some(category) {
            return Ok(());
        }
        if self.current_step() > Step::Categorie {
            return Err(DomainError::invariant(
                "the category is immutable once step 1 is confirmed",
            ));
        }
        // A changed category discards the previous variant's detail.
        self.draft.line_items = Some(LineItems::empty_for(category));
        Ok(())
    }

    /// Current financial summary, re-evaluated from the draft on every call.
    pub fn summary(&self) -> FinancialSummary {
        self.draft.summary(&self.catalog)
    }

    /// Structural pre-submission validation, checked in step order. Nothing
    /// that fails here ever reaches the network.
    pub fn validate_for_submission(&self) -> DomainResult<()> {
        let Some(items) = self.draft.line_items.as_ref() else {
            return Err(DomainError::validation("choose a document category"));
        };
        if self.draft.client.is_none() {
            return Err(DomainError::validation("select a client"));
        }
        if !items.is_complete() {
            return Err(DomainError::validation(items.completeness_requirement()));
        }
        self.draft.taxes.validate_for_submission()
    }

    /// Explicit user confirmation on the recap step. Structural validity
    /// alone never submits; this is the separate intent gate.
    pub fn confirm_review(&mut self) -> DomainResult<()> {
        if self.current_step() != Step::Recapitulatif {
            return Err(DomainError::invariant(
                "confirmation happens on the recap step",
            ));
        }
        self.validate_for_submission()?;
        self.confirmed = true;
        Ok(())
    }

    pub fn is_confirmed(&self) -> bool {
        self.confirmed
    }

    /// Gate a submission attempt. Refuses without confirmation (an implicit
    /// form submit is a no-op with feedback) and while a request is already
    /// in flight (no duplicate orders from a double-click).
    pub fn begin_submission(&mut self) -> DomainResult<()> {
        if !self.confirmed {
            return Err(DomainError::validation(
                "confirm the review before submitting",
            ));
        }
        if self.submission_in_flight {
            return Err(DomainError::conflict("a submission is already in flight"));
        }
        self.submission_in_flight = true;
        Ok(())
    }

    pub fn submission_in_flight(&self) -> bool {
        self.submission_in_flight
    }

    /// Close the in-flight window. On failure the draft is untouched so the
    /// user can retry without re-entering anything; on success the caller
    /// must clear the persisted draft slot.
    pub fn finish_submission(&mut self, success: bool) {
        self.submission_in_flight = false;
        if success {
            self.confirmed = false;
        }
    }
}

fn annotate_step(step: Step, err: DomainError) -> DomainError {
    match err {
        DomainError::Validation(msg) => {
            DomainError::validation(format!("step {step}: {msg}"))
        }
        other => other,
    }
}
