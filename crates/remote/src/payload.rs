//! Mapping from the in-memory document to the remote API's payload shape.

use chrono::NaiveDate;
use serde::Serialize;

use fretdesk_core::{ClientId, DomainError, DomainResult};
use fretdesk_orders::{LineItems, OrdreDraft};
use fretdesk_pricing::{Remise, TaxCatalog};

/// One container as the API expects it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConteneurPayload {
    pub numero: String,
    pub taille: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub prix_unitaire: u64,
    pub operations: Vec<OperationPayload>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OperationPayload {
    #[serde(rename = "type")]
    pub operation: String,
    pub quantite: u32,
    pub prix_unitaire: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LotPayload {
    pub designation: String,
    pub quantite: u32,
    pub prix_unitaire: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LignePayload {
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub origine: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub destination: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_debut: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_fin: Option<NaiveDate>,
    pub quantite: u32,
    pub prix_unitaire: u64,
}

/// The create/update body. Exactly one of `conteneurs`/`lots`/`lignes` is
/// present, matching `type_document`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrdrePayload {
    pub client_id: ClientId,
    pub type_document: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub direction: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub numero_bl: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub armateur: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transitaire: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub agent: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lieu_chargement: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lieu_dechargement: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub type_operation: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub conteneurs: Option<Vec<ConteneurPayload>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lots: Option<Vec<LotPayload>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lignes: Option<Vec<LignePayload>>,
    pub remise_type: String,
    pub remise_valeur: f64,
    pub remise_montant: u64,
    pub taxes_selectionnees: Vec<String>,
    pub exoneration: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub taxes_exonerees: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub motif_exoneration: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

fn non_empty(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// Build the remote payload from the composed document.
///
/// The caller has already run the wizard's pre-submission validation; this
/// still refuses a structurally unusable draft rather than emitting a body
/// the API would reject for shape.
pub fn to_payload(draft: &OrdreDraft, catalog: &TaxCatalog) -> DomainResult<OrdrePayload> {
    let client = draft
        .client
        .as_ref()
        .ok_or_else(|| DomainError::validation("select a client"))?;
    let items = draft
        .line_items
        .as_ref()
        .ok_or_else(|| DomainError::validation("choose a document category"))?;

    let summary = draft.summary(catalog);
    let (remise_type, remise_valeur) = match &draft.remise {
        Remise::Aucune => ("aucune", 0.0),
        Remise::Pourcentage { taux } => ("pourcentage", *taux),
        Remise::Fixe { montant } => ("fixe", montant.francs() as f64),
    };

    let mut payload = OrdrePayload {
        client_id: client.id,
        type_document: items.category().as_str().to_string(),
        direction: None,
        numero_bl: None,
        armateur: None,
        transitaire: None,
        agent: None,
        lieu_chargement: None,
        lieu_dechargement: None,
        type_operation: None,
        conteneurs: None,
        lots: None,
        lignes: None,
        remise_type: remise_type.to_string(),
        remise_valeur,
        remise_montant: summary.remise_montant.francs(),
        taxes_selectionnees: draft.taxes.selected.iter().cloned().collect(),
        exoneration: draft.taxes.has_exoneration,
        taxes_exonerees: if draft.taxes.has_exoneration {
            draft.taxes.exonerated.iter().cloned().collect()
        } else {
            Vec::new()
        },
        motif_exoneration: draft
            .taxes
            .has_exoneration
            .then(|| draft.taxes.reason.clone())
            .and_then(|r| non_empty(&r)),
        notes: non_empty(&draft.notes),
    };

    match items {
        LineItems::Conteneurs(set) => {
            payload.direction = Some(
                match set.direction {
                    fretdesk_orders::Direction::Import => "import",
                    fretdesk_orders::Direction::Export => "export",
                }
                .to_string(),
            );
            payload.numero_bl = non_empty(&set.numero_bl);
            payload.armateur = non_empty(&set.armateur);
            payload.transitaire = non_empty(&set.transitaire);
            payload.agent = non_empty(&set.agent);
            payload.conteneurs = Some(
                set.conteneurs
                    .iter()
                    .map(|c| ConteneurPayload {
                        numero: c.numero.trim().to_string(),
                        taille: match c.taille {
                            fretdesk_orders::TailleConteneur::Pieds20 => "20".to_string(),
                            fretdesk_orders::TailleConteneur::Pieds40 => "40".to_string(),
                        },
                        description: non_empty(&c.description),
                        prix_unitaire: c.prix_unitaire.francs(),
                        operations: c
                            .operations
                            .iter()
                            .map(|op| OperationPayload {
                                operation: op.operation.clone(),
                                quantite: op.quantite,
                                prix_unitaire: op.prix_unitaire.francs(),
                            })
                            .collect(),
                    })
                    .collect(),
            );
        }
        LineItems::Conventionnel(set) => {
            payload.numero_bl = non_empty(&set.numero_bl);
            payload.lieu_chargement = non_empty(&set.lieu_chargement);
            payload.lieu_dechargement = non_empty(&set.lieu_dechargement);
            payload.lots = Some(
                set.lots
                    .iter()
                    .map(|l| LotPayload {
                        designation: l.designation.trim().to_string(),
                        quantite: l.quantite,
                        prix_unitaire: l.prix_unitaire.francs(),
                    })
                    .collect(),
            );
        }
        LineItems::OperationsIndependantes(set) => {
            payload.type_operation = Some(
                match set.operation {
                    fretdesk_orders::TypeOperation::Transport => "transport",
                    fretdesk_orders::TypeOperation::Manutention => "manutention",
                    fretdesk_orders::TypeOperation::Stockage => "stockage",
                    fretdesk_orders::TypeOperation::Location => "location",
                    fretdesk_orders::TypeOperation::DoubleRelevage => "double_relevage",
                }
                .to_string(),
            );
            payload.lignes = Some(
                set.prestations
                    .iter()
                    .map(|p| LignePayload {
                        description: p.description.trim().to_string(),
                        origine: non_empty(&p.origine),
                        destination: non_empty(&p.destination),
                        date_debut: p.date_debut,
                        date_fin: p.date_fin,
                        quantite: p.quantite,
                        prix_unitaire: p.prix_unitaire.francs(),
                    })
                    .collect(),
            );
        }
    }

    Ok(payload)
}

#[cfg(test)]
mod tests {
    use super::*;
    use fretdesk_core::{ClientId, Money};
    use fretdesk_orders::{
        BulkLotSet, Category, ClientRef, Conteneur, ContainerSet, Lot, OperationLigne,
        TailleConteneur,
    };
    use fretdesk_pricing::{TaxDefinition, TaxSelection};

    fn catalog() -> TaxCatalog {
        TaxCatalog::new(vec![
            TaxDefinition {
                code: "TVA".to_string(),
                label: "TVA".to_string(),
                rate: 0.18,
                mandatory: true,
            },
            TaxDefinition {
                code: "CSS".to_string(),
                label: "CSS".to_string(),
                rate: 0.01,
                mandatory: true,
            },
        ])
    }

    fn base_draft() -> OrdreDraft {
        let mut draft = OrdreDraft::new();
        draft.client = Some(ClientRef {
            id: ClientId::new(),
            nom: "SOGAT".to_string(),
        });
        draft.taxes = TaxSelection::with_codes(["TVA", "CSS"]);
        draft
    }

    #[test]
    fn container_draft_maps_to_the_conteneurs_array_only() {
        let mut draft = base_draft();
        draft.line_items = Some(LineItems::Conteneurs(ContainerSet {
            numero_bl: " BL-778 ".to_string(),
            conteneurs: vec![Conteneur {
                numero: "MSCU1234567".to_string(),
                taille: TailleConteneur::Pieds20,
                description: String::new(),
                prix_unitaire: Money::from_francs(50_000),
                operations: vec![OperationLigne {
                    operation: "arrivee".to_string(),
                    quantite: 1,
                    prix_unitaire: Money::from_francs(10_000),
                }],
            }],
            ..ContainerSet::default()
        }));

        let payload = to_payload(&draft, &catalog()).unwrap();
        assert_eq!(payload.type_document, "conteneurs");
        assert_eq!(payload.numero_bl.as_deref(), Some("BL-778"));
        assert!(payload.lots.is_none());
        assert!(payload.lignes.is_none());

        let json = serde_json::to_value(&payload).unwrap();
        assert!(json.get("conteneurs").is_some());
        assert!(json.get("lots").is_none());
        assert!(json.get("lignes").is_none());
        assert_eq!(json["conteneurs"][0]["operations"][0]["type"], "arrivee");
    }

    #[test]
    fn bulk_draft_maps_lots_and_remise_fields() {
        let mut draft = base_draft();
        draft.remise = Remise::Fixe {
            montant: Money::from_francs(15_000),
        };
        draft.line_items = Some(LineItems::Conventionnel(BulkLotSet {
            lots: vec![Lot {
                designation: "Sacs de riz".to_string(),
                quantite: 200,
                prix_unitaire: Money::from_francs(500),
            }],
            ..BulkLotSet::default()
        }));

        let payload = to_payload(&draft, &catalog()).unwrap();
        assert_eq!(payload.type_document, "conventionnel");
        assert_eq!(payload.remise_type, "fixe");
        assert_eq!(payload.remise_valeur, 15_000.0);
        assert_eq!(payload.remise_montant, 15_000);
        assert_eq!(payload.lots.as_ref().unwrap().len(), 1);
        assert!(payload.conteneurs.is_none());
    }

    #[test]
    fn exoneration_fields_only_appear_when_flagged() {
        let mut draft = base_draft();
        draft.line_items = Some(LineItems::empty_for(Category::Conteneurs));
        draft.taxes.exonerated.insert("TVA".to_string());
        draft.taxes.reason = "Export".to_string();

        // Flag off: the exonerated set and reason are not emitted.
        let payload = to_payload(&draft, &catalog()).unwrap();
        assert!(!payload.exoneration);
        assert!(payload.taxes_exonerees.is_empty());
        assert!(payload.motif_exoneration.is_none());

        draft.taxes.has_exoneration = true;
        let payload = to_payload(&draft, &catalog()).unwrap();
        assert!(payload.exoneration);
        assert_eq!(payload.taxes_exonerees, vec!["TVA".to_string()]);
        assert_eq!(payload.motif_exoneration.as_deref(), Some("Export"));
    }

    #[test]
    fn notes_are_trimmed_and_dropped_when_empty() {
        let mut draft = base_draft();
        draft.line_items = Some(LineItems::empty_for(Category::Conteneurs));
        draft.notes = "   ".to_string();
        let payload = to_payload(&draft, &catalog()).unwrap();
        assert!(payload.notes.is_none());

        draft.notes = "  livraison de nuit ".to_string();
        let payload = to_payload(&draft, &catalog()).unwrap();
        assert_eq!(payload.notes.as_deref(), Some("livraison de nuit"));
    }

    #[test]
    fn draft_without_client_or_category_is_refused() {
        let draft = OrdreDraft::new();
        assert!(to_payload(&draft, &catalog()).is_err());

        let mut draft = OrdreDraft::new();
        draft.client = Some(ClientRef {
            id: ClientId::new(),
            nom: "SOGAT".to_string(),
        });
        let err = to_payload(&draft, &catalog()).unwrap_err();
        assert!(err.to_string().contains("category"));
    }
}
