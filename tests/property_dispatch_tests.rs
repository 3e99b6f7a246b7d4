use easy_graph::api::{ChartDispatcher, ChartOutcome};
use easy_graph::core::{ChartKind, ChartOptions, ChartRequest, Column, Dataset};
use easy_graph::render::BackendMode;
use proptest::prelude::*;

const THEMES: [Option<&str>; 5] = [None, Some("ggplot"), Some("darkgrid"), Some("nope"), Some("")];

fn sample() -> Dataset {
    Dataset::new()
        .with_column("Month", Column::categorical(["Jan", "Feb", "Mar", "Apr"]))
        .and_then(|data| data.with_column("Sales", Column::numeric([100.0, 200.0, 150.0, 250.0])))
        .and_then(|data| data.with_column("Expense", Column::numeric([90.0, 170.0, 130.0, 210.0])))
        .expect("valid dataset")
}

fn call_strategy() -> impl Strategy<Value = (usize, usize, Option<bool>, bool)> {
    (
        0..ChartKind::ALL.len(),
        0..THEMES.len(),
        prop::option::of(any::<bool>()),
        any::<bool>(),
    )
}

proptest! {
    #[test]
    fn every_call_leaves_the_baseline_theme_active(
        calls in prop::collection::vec(call_strategy(), 1..24)
    ) {
        let data = sample();
        let mut charts = ChartDispatcher::headless().expect("dispatcher init");
        let mut rendered = 0_u64;

        for (kind_index, theme_index, interactive, missing) in calls {
            let kind = ChartKind::ALL[kind_index];
            let mut options = ChartOptions::default();
            options.theme = THEMES[theme_index].map(str::to_owned);
            options.interactive = interactive;
            let selectors = if missing {
                vec!["Month", "Ghost"]
            } else {
                vec!["Sales", "Expense"]
            };

            let outcome = charts.render(ChartRequest::new(kind, &data, selectors, options));

            prop_assert!(charts.theme().is_baseline());
            if interactive == Some(false) && !kind.descriptor().supports(BackendMode::Static) {
                prop_assert_eq!(
                    &outcome,
                    &ChartOutcome::UnsupportedBackend { kind, mode: BackendMode::Static }
                );
            }
            if missing {
                prop_assert!(!outcome.is_rendered());
            }
            if outcome.is_rendered() {
                rendered += 1;
            }
        }

        prop_assert_eq!(
            charts.static_backend().render_count + charts.interactive_backend().render_count(),
            rendered
        );
    }
}
