use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use fretdesk_core::Money;
use fretdesk_pricing::{compose, Remise, TaxCatalog, TaxDefinition, TaxSelection};

fn catalog() -> TaxCatalog {
    TaxCatalog::new(vec![
        TaxDefinition {
            code: "TVA".to_string(),
            label: "Taxe sur la valeur ajoutée".to_string(),
            rate: 0.18,
            mandatory: true,
        },
        TaxDefinition {
            code: "CSS".to_string(),
            label: "Contribution spéciale de solidarité".to_string(),
            rate: 0.01,
            mandatory: true,
        },
        TaxDefinition {
            code: "TSL".to_string(),
            label: "Taxe spéciale logistique".to_string(),
            rate: 0.025,
            mandatory: false,
        },
    ])
}

fn bench_compose(c: &mut Criterion) {
    let catalog = catalog();
    let remise = Remise::Pourcentage { taux: 7.5 };
    let mut selection = TaxSelection::with_codes(["TVA", "CSS", "TSL"]);
    selection.set_exoneration(true);
    selection.exonerate("TSL").unwrap();
    selection.reason = "Convention".to_string();

    let mut group = c.benchmark_group("compose");
    for base in [60_000u64, 1_000_000, 1_000_000_000] {
        group.bench_with_input(BenchmarkId::from_parameter(base), &base, |b, &base| {
            b.iter(|| {
                compose(
                    black_box(Money::from_francs(base)),
                    black_box(&remise),
                    black_box(&catalog),
                    black_box(&selection),
                )
            })
        });
    }
    group.finish();
}

criterion_group!(benches, bench_compose);
criterion_main!(benches);
