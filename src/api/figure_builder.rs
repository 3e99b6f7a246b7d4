use crate::core::{
    ChartDescriptor, ChartKind, ChartRequest, DEFAULT_FEATURE_ID_KEY, DEFAULT_HEXBIN_GRID_SIZE,
    DEFAULT_HISTOGRAM_BINS, DEFAULT_LAG, Dataset, SelectorSlot,
};
use crate::error::{ChartError, ChartResult};
use crate::render::{Figure, FigureParams, FigureSeries};
use crate::theme::Style;

/// Pairs each selector with the descriptor slot it fills.
///
/// An optional variadic slot left empty expands to every numeric column.
pub(crate) fn match_selectors<'r>(
    descriptor: &ChartDescriptor,
    dataset: &'r Dataset,
    selectors: &'r [String],
) -> ChartResult<Vec<(SelectorSlot, &'r str)>> {
    let mut matched = Vec::with_capacity(selectors.len().max(descriptor.slots.len()));
    let mut remaining = selectors.iter().map(String::as_str);

    for slot in descriptor.slots {
        if slot.variadic {
            let rest: Vec<&str> = remaining.by_ref().collect();
            if rest.is_empty() {
                if slot.required {
                    return Err(arity_error(descriptor, selectors.len()));
                }
                matched.extend(dataset.numeric_column_names().map(|name| (*slot, name)));
            } else {
                matched.extend(rest.into_iter().map(|name| (*slot, name)));
            }
            continue;
        }

        match remaining.next() {
            Some(name) => matched.push((*slot, name)),
            None if slot.required => return Err(arity_error(descriptor, selectors.len())),
            None => {}
        }
    }

    if remaining.next().is_some() {
        return Err(arity_error(descriptor, selectors.len()));
    }
    Ok(matched)
}

fn arity_error(descriptor: &ChartDescriptor, supplied: usize) -> ChartError {
    let variadic = descriptor.slots.iter().any(|slot| slot.variadic);
    ChartError::InvalidData(format!(
        "{} charts take {}{} column selector(s), got {supplied}",
        descriptor.name,
        descriptor.required_selectors(),
        if variadic { " or more" } else { "" },
    ))
}

/// Resolves the request's selectors against its dataset and fills defaults.
pub(crate) fn build_figure(request: &ChartRequest<'_>, style: Style) -> ChartResult<Figure> {
    let descriptor = request.kind.descriptor();
    let options = &request.options;

    let mut figure = Figure::new(
        request.kind,
        options
            .title
            .clone()
            .unwrap_or_else(|| descriptor.default_title.to_owned()),
        style,
    )
    .with_labels(
        options
            .x_label
            .clone()
            .or_else(|| descriptor.default_x_label.map(str::to_owned)),
        options
            .y_label
            .clone()
            .or_else(|| descriptor.default_y_label.map(str::to_owned)),
    );

    for (slot, name) in match_selectors(descriptor, request.dataset, &request.selectors)? {
        let column = request
            .dataset
            .column(name)
            .ok_or_else(|| ChartError::SelectorNotFound {
                column: name.to_owned(),
            })?;
        let series = FigureSeries::new(name, slot.role, column.clone());
        figure = figure.with_series(if slot.numeric { series.numeric() } else { series });
    }

    let params = match request.kind {
        ChartKind::Histogram => FigureParams {
            bins: Some(options.bins.unwrap_or(DEFAULT_HISTOGRAM_BINS)),
            ..FigureParams::default()
        },
        ChartKind::Hexbin => FigureParams {
            grid_size: Some(options.grid_size.unwrap_or(DEFAULT_HEXBIN_GRID_SIZE)),
            ..FigureParams::default()
        },
        ChartKind::Lag => FigureParams {
            lag: Some(options.lag.unwrap_or(DEFAULT_LAG)),
            ..FigureParams::default()
        },
        ChartKind::Choropleth => FigureParams {
            geojson: options.geojson.clone(),
            feature_id_key: Some(
                options
                    .feature_id_key
                    .clone()
                    .unwrap_or_else(|| DEFAULT_FEATURE_ID_KEY.to_owned()),
            ),
            ..FigureParams::default()
        },
        _ => FigureParams::default(),
    };

    Ok(figure.with_params(params))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{ChartOptions, Column, SeriesRole};
    use crate::theme::{BASELINE_STYLE, StyleRegistry};

    fn dataset() -> Dataset {
        Dataset::new()
            .with_column("Month", Column::categorical(["Jan", "Feb"]))
            .and_then(|data| data.with_column("Sales", Column::numeric([100.0, 200.0])))
            .and_then(|data| data.with_column("Expense", Column::numeric([90.0, 170.0])))
            .expect("dataset")
    }

    fn style() -> Style {
        StyleRegistry::general()
            .get(BASELINE_STYLE)
            .cloned()
            .expect("baseline")
    }

    #[test]
    fn empty_variadic_selectors_expand_to_numeric_columns() {
        let data = dataset();
        let request = ChartRequest::new(
            ChartKind::CorrelationMatrix,
            &data,
            Vec::<String>::new(),
            ChartOptions::default(),
        );
        let figure = build_figure(&request, style()).expect("figure");
        let names: Vec<_> = figure
            .series_with_role(SeriesRole::Column)
            .map(|series| series.name.as_str())
            .collect();
        assert_eq!(names, ["Sales", "Expense"]);
    }

    #[test]
    fn too_many_selectors_is_rejected() {
        let data = dataset();
        let request = ChartRequest::new(
            ChartKind::Bar,
            &data,
            ["Month", "Sales", "Expense"],
            ChartOptions::default(),
        );
        let err = build_figure(&request, style()).expect_err("arity");
        assert!(err.to_string().contains("take 2 column selector(s), got 3"));
    }

    #[test]
    fn defaults_fill_title_labels_and_bins() {
        let data = dataset();
        let request =
            ChartRequest::new(ChartKind::Histogram, &data, ["Sales"], ChartOptions::default());
        let figure = build_figure(&request, style()).expect("figure");
        assert_eq!(figure.title, "Histogram");
        assert_eq!(figure.y_label.as_deref(), Some("Frequency"));
        assert_eq!(figure.params.bins, Some(DEFAULT_HISTOGRAM_BINS));
    }

    #[test]
    fn missing_column_names_the_selector() {
        let data = dataset();
        let request =
            ChartRequest::new(ChartKind::Line, &data, ["Month", "Profit"], ChartOptions::default());
        let err = build_figure(&request, style()).expect_err("missing");
        assert!(matches!(err, ChartError::SelectorNotFound { column } if column == "Profit"));
    }
}
