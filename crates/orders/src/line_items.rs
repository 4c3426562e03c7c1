//! The three line-item shapes and their shared derived subtotal.
//!
//! The financial pipeline only ever sees [`LineItems::subtotal`]; variant
//! fields never leak past this module.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use fretdesk_core::Money;

use crate::category::Category;

/// Operation direction for container orders.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Import,
    Export,
}

/// Standard container sizes.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TailleConteneur {
    #[serde(rename = "20")]
    Pieds20,
    #[serde(rename = "40")]
    Pieds40,
}

/// A billable operation attached to a container (e.g. arrivée, relevage).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OperationLigne {
    pub operation: String,
    pub quantite: u32,
    /// Price in whole francs.
    pub prix_unitaire: Money,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Conteneur {
    pub numero: String,
    pub taille: TailleConteneur,
    #[serde(default)]
    pub description: String,
    /// Base handling price for the container itself (counted once).
    pub prix_unitaire: Money,
    #[serde(default)]
    pub operations: Vec<OperationLigne>,
}

impl Conteneur {
    fn subtotal(&self) -> Money {
        let ops: Money = self
            .operations
            .iter()
            .map(|op| op.prix_unitaire.times(op.quantite))
            .sum();
        self.prix_unitaire + ops
    }
}

/// Container order detail: direction, references, containers and their
/// operations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContainerSet {
    pub direction: Direction,
    #[serde(default)]
    pub numero_bl: String,
    #[serde(default)]
    pub armateur: String,
    #[serde(default)]
    pub transitaire: String,
    #[serde(default)]
    pub agent: String,
    #[serde(default)]
    pub conteneurs: Vec<Conteneur>,
}

impl ContainerSet {
    pub fn subtotal(&self) -> Money {
        self.conteneurs.iter().map(Conteneur::subtotal).sum()
    }

    /// Complete ⇔ at least one container carries a number.
    pub fn is_complete(&self) -> bool {
        self.conteneurs.iter().any(|c| !c.numero.trim().is_empty())
    }
}

impl Default for ContainerSet {
    fn default() -> Self {
        Self {
            direction: Direction::Import,
            numero_bl: String::new(),
            armateur: String::new(),
            transitaire: String::new(),
            agent: String::new(),
            conteneurs: Vec::new(),
        }
    }
}

/// One bulk-cargo lot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Lot {
    pub designation: String,
    pub quantite: u32,
    pub prix_unitaire: Money,
}

/// Conventional (bulk) order detail.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BulkLotSet {
    #[serde(default)]
    pub numero_bl: String,
    #[serde(default)]
    pub lieu_chargement: String,
    #[serde(default)]
    pub lieu_dechargement: String,
    #[serde(default)]
    pub lots: Vec<Lot>,
}

impl BulkLotSet {
    pub fn subtotal(&self) -> Money {
        self.lots
            .iter()
            .map(|l| l.prix_unitaire.times(l.quantite))
            .sum()
    }

    /// Complete ⇔ at least one lot carries a designation.
    pub fn is_complete(&self) -> bool {
        self.lots.iter().any(|l| !l.designation.trim().is_empty())
    }
}

/// Sub-type of an independent operation.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TypeOperation {
    Transport,
    Manutention,
    Stockage,
    Location,
    DoubleRelevage,
}

/// One independent service line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prestation {
    pub description: String,
    #[serde(default)]
    pub origine: String,
    #[serde(default)]
    pub destination: String,
    #[serde(default)]
    pub date_debut: Option<NaiveDate>,
    #[serde(default)]
    pub date_fin: Option<NaiveDate>,
    pub quantite: u32,
    pub prix_unitaire: Money,
}

/// Independent-services order detail.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndependentServiceSet {
    pub operation: TypeOperation,
    #[serde(default)]
    pub prestations: Vec<Prestation>,
}

impl IndependentServiceSet {
    pub fn subtotal(&self) -> Money {
        self.prestations
            .iter()
            .map(|p| p.prix_unitaire.times(p.quantite))
            .sum()
    }

    /// Complete ⇔ at least one prestation carries a description.
    pub fn is_complete(&self) -> bool {
        self.prestations
            .iter()
            .any(|p| !p.description.trim().is_empty())
    }
}

impl Default for IndependentServiceSet {
    fn default() -> Self {
        Self {
            operation: TypeOperation::Manutention,
            prestations: Vec::new(),
        }
    }
}

/// The discriminated union over [`Category`]. One financial pipeline, three
/// input shapes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "categorie", rename_all = "snake_case")]
pub enum LineItems {
    Conteneurs(ContainerSet),
    Conventionnel(BulkLotSet),
    OperationsIndependantes(IndependentServiceSet),
}

impl LineItems {
    /// Fresh, empty detail for a just-confirmed category.
    pub fn empty_for(category: Category) -> Self {
        match category {
            Category::Conteneurs => LineItems::Conteneurs(ContainerSet::default()),
            Category::Conventionnel => LineItems::Conventionnel(BulkLotSet::default()),
            Category::OperationsIndependantes => {
                LineItems::OperationsIndependantes(IndependentServiceSet::default())
            }
        }
    }

    pub fn category(&self) -> Category {
        match self {
            LineItems::Conteneurs(_) => Category::Conteneurs,
            LineItems::Conventionnel(_) => Category::Conventionnel,
            LineItems::OperationsIndependantes(_) => Category::OperationsIndependantes,
        }
    }

    /// Derived HT subtotal, the single numeric bridge to the composer.
    pub fn subtotal(&self) -> Money {
        match self {
            LineItems::Conteneurs(set) => set.subtotal(),
            LineItems::Conventionnel(set) => set.subtotal(),
            LineItems::OperationsIndependantes(set) => set.subtotal(),
        }
    }

    pub fn is_complete(&self) -> bool {
        match self {
            LineItems::Conteneurs(set) => set.is_complete(),
            LineItems::Conventionnel(set) => set.is_complete(),
            LineItems::OperationsIndependantes(set) => set.is_complete(),
        }
    }

    /// Human-readable reason shown when the completeness invariant blocks a
    /// forward step.
    pub fn completeness_requirement(&self) -> &'static str {
        match self {
            LineItems::Conteneurs(_) => "add at least one container with a number",
            LineItems::Conventionnel(_) => "add at least one lot with a designation",
            LineItems::OperationsIndependantes(_) => {
                "add at least one service with a description"
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn container(numero: &str, prix: u64, ops: Vec<OperationLigne>) -> Conteneur {
        Conteneur {
            numero: numero.to_string(),
            taille: TailleConteneur::Pieds20,
            description: String::new(),
            prix_unitaire: Money::from_francs(prix),
            operations: ops,
        }
    }

    #[test]
    fn container_subtotal_counts_base_price_once_plus_operations() {
        let set = ContainerSet {
            conteneurs: vec![container(
                "MSCU1234567",
                50_000,
                vec![OperationLigne {
                    operation: "arrivee".to_string(),
                    quantite: 1,
                    prix_unitaire: Money::from_francs(10_000),
                }],
            )],
            ..ContainerSet::default()
        };

        assert_eq!(set.subtotal().francs(), 60_000);
    }

    #[test]
    fn container_set_completeness_requires_a_numbered_container() {
        let mut set = ContainerSet::default();
        assert!(!set.is_complete());

        set.conteneurs.push(container("   ", 1_000, vec![]));
        assert!(!set.is_complete());

        set.conteneurs.push(container("TCLU7654321", 1_000, vec![]));
        assert!(set.is_complete());
    }

    #[test]
    fn lot_subtotal_is_quantity_times_unit_price() {
        let set = BulkLotSet {
            lots: vec![
                Lot {
                    designation: "Sacs de riz".to_string(),
                    quantite: 120,
                    prix_unitaire: Money::from_francs(500),
                },
                Lot {
                    designation: "Fûts d'huile".to_string(),
                    quantite: 10,
                    prix_unitaire: Money::from_francs(8_000),
                },
            ],
            ..BulkLotSet::default()
        };

        assert_eq!(set.subtotal().francs(), 120 * 500 + 10 * 8_000);
    }

    #[test]
    fn service_set_completeness_requires_a_description() {
        let mut set = IndependentServiceSet::default();
        assert!(!set.is_complete());

        set.prestations.push(Prestation {
            description: String::new(),
            origine: String::new(),
            destination: String::new(),
            date_debut: None,
            date_fin: None,
            quantite: 2,
            prix_unitaire: Money::from_francs(15_000),
        });
        assert!(!set.is_complete());
        assert_eq!(set.subtotal().francs(), 30_000);

        set.prestations[0].description = "Transport Libreville → Owendo".to_string();
        assert!(set.is_complete());
    }

    #[test]
    fn union_dispatches_category_and_subtotal() {
        let items = LineItems::empty_for(Category::Conventionnel);
        assert_eq!(items.category(), Category::Conventionnel);
        assert_eq!(items.subtotal(), Money::ZERO);
        assert!(!items.is_complete());
    }
}
