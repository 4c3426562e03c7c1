//! Wizard steps and their ordering.

/// The four wizard steps, in order.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Step {
    Categorie,
    Client,
    Details,
    Recapitulatif,
}

impl Step {
    pub const ALL: [Step; 4] = [
        Step::Categorie,
        Step::Client,
        Step::Details,
        Step::Recapitulatif,
    ];

    /// One-based position, as shown on step indicators and persisted in
    /// drafts.
    pub fn number(self) -> u8 {
        match self {
            Step::Categorie => 1,
            Step::Client => 2,
            Step::Details => 3,
            Step::Recapitulatif => 4,
        }
    }

    pub fn from_number(n: u8) -> Option<Step> {
        Step::ALL.into_iter().find(|s| s.number() == n)
    }

    pub fn next(self) -> Option<Step> {
        Step::from_number(self.number() + 1)
    }

    pub fn previous(self) -> Option<Step> {
        self.number().checked_sub(1).and_then(Step::from_number)
    }

    /// Steps strictly after `self` up to and including `target`, in ascending
    /// order: the prerequisites a forward jump must clear.
    pub fn span_to(self, target: Step) -> impl Iterator<Item = Step> {
        Step::ALL
            .into_iter()
            .filter(move |s| *s > self && *s <= target)
    }
}

impl core::fmt::Display for Step {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let name = match self {
            Step::Categorie => "catégorie",
            Step::Client => "client",
            Step::Details => "détails",
            Step::Recapitulatif => "récapitulatif",
        };
        write!(f, "{} ({name})", self.number())
    }
}
