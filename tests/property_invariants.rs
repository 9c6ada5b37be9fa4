use proptest::prelude::*;

use masslookup::{
    adduct::{neutral_mass_to_observed, observed_to_neutral, Adduct, AdductMode},
    compound::Compound,
    core::store::CompoundStore,
    query::SearchQuery,
    search,
    types::{Source, SourceFilter},
};

fn adduct_strategy() -> impl Strategy<Value = Adduct> {
    prop_oneof![
        Just(Adduct::Neutral),
        (0usize..AdductMode::ALL.len()).prop_map(|i| Adduct::Ion(AdductMode::ALL[i])),
    ]
}

fn source_strategy() -> impl Strategy<Value = Source> {
    (0usize..Source::ALL.len()).prop_map(|i| Source::ALL[i])
}

fn store_strategy() -> impl Strategy<Value = CompoundStore> {
    prop::collection::vec((50.0f64..500.0, source_strategy(), 0u8..6), 1..120).prop_map(|rows| {
        CompoundStore::from_compounds(rows.into_iter().enumerate().map(|(i, (mass, source, n))| {
            Compound {
                id: format!("ID{i:05}"),
                name: format!("compound-{}", i % 7),
                formula: format!("C{}H{}O{}", n + 1, 2 * n + 2, n % 3 + 1),
                monoisotopic_mass: mass,
                source,
                source_url: String::new(),
            }
        }))
    })
}

proptest! {
    #[test]
    fn adduct_conversion_round_trips(mass in 1.0f64..5000.0, adduct in adduct_strategy()) {
        let back = observed_to_neutral(neutral_mass_to_observed(mass, adduct), adduct);
        prop_assert!((back - mass).abs() <= 1e-9, "{mass} -> {back} via {adduct}");
    }

    #[test]
    fn mass_results_are_in_window_and_ranked(
        store in store_strategy(),
        observed in 40.0f64..520.0,
        tolerance in 0.001f64..50.0,
        adduct in adduct_strategy(),
    ) {
        let results = search(&store, &SearchQuery::mass(observed, adduct).with_tolerance(tolerance))
            .expect("valid query");
        let target = observed_to_neutral(observed, adduct);

        for r in &results {
            let err = r.mass_error_da().expect("mass mode");
            prop_assert!(err.abs() <= tolerance + 1e-9);
            prop_assert!((r.compound.monoisotopic_mass - target - err).abs() <= 1e-9);
        }
        for pair in results.windows(2) {
            let a = pair[0].mass_error_da().unwrap().abs();
            let b = pair[1].mass_error_da().unwrap().abs();
            prop_assert!(a <= b);
        }

        let expected = store
            .compounds()
            .iter()
            .filter(|c| {
                c.monoisotopic_mass >= target - tolerance && c.monoisotopic_mass <= target + tolerance
            })
            .count();
        prop_assert_eq!(results.len(), expected);
    }

    #[test]
    fn narrower_source_filter_is_a_subset(
        store in store_strategy(),
        observed in 40.0f64..520.0,
        tolerance in 0.1f64..100.0,
        extra in source_strategy(),
    ) {
        let base = SearchQuery::mass(observed, Adduct::Neutral).with_tolerance(tolerance);
        let narrow = search(&store, &base.clone().with_sources(SourceFilter::only([Source::Hmdb])))
            .expect("narrow");
        let wide = search(&store, &base.with_sources(SourceFilter::only([Source::Hmdb, extra])))
            .expect("wide");

        for r in &narrow {
            prop_assert_eq!(r.compound.source, Source::Hmdb);
            prop_assert!(wide.iter().any(|w| w.compound.id == r.compound.id));
        }
    }

    #[test]
    fn formula_search_matches_only_identical_composition(store in store_strategy(), n in 0u8..6) {
        let formula = format!("C{}H{}O{}", n + 1, 2 * n + 2, n % 3 + 1);
        let canonical = masslookup::formula::canonicalize(&formula).expect("grammar");
        let results = search(&store, &SearchQuery::formula(formula)).expect("valid query");

        let expected = store.compounds().iter().filter(|c| c.formula == canonical).count();
        prop_assert_eq!(results.len(), expected);
        prop_assert!(results.iter().all(|r| r.compound.formula == canonical));
    }
}
