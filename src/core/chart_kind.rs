use std::fmt;

use serde::{Deserialize, Serialize};

use crate::render::BackendMode;

pub const DEFAULT_HISTOGRAM_BINS: u32 = 10;
pub const DEFAULT_HEXBIN_GRID_SIZE: u32 = 50;
pub const DEFAULT_LAG: usize = 1;
pub const DEFAULT_FEATURE_ID_KEY: &str = "id";

/// Every chart the dispatcher knows how to route.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartKind {
    Bar,
    Line,
    Scatter,
    Histogram,
    Boxplot,
    Pie,
    StackedBar,
    Area,
    Hexbin,
    Violin,
    CorrelationMatrix,
    PairPlot,
    Candlestick,
    Autocorrelation,
    Lag,
    Choropleth,
    ScatterGeo,
    LineGeo,
}

impl ChartKind {
    pub const ALL: [ChartKind; 18] = [
        ChartKind::Bar,
        ChartKind::Line,
        ChartKind::Scatter,
        ChartKind::Histogram,
        ChartKind::Boxplot,
        ChartKind::Pie,
        ChartKind::StackedBar,
        ChartKind::Area,
        ChartKind::Hexbin,
        ChartKind::Violin,
        ChartKind::CorrelationMatrix,
        ChartKind::PairPlot,
        ChartKind::Candlestick,
        ChartKind::Autocorrelation,
        ChartKind::Lag,
        ChartKind::Choropleth,
        ChartKind::ScatterGeo,
        ChartKind::LineGeo,
    ];

    #[must_use]
    pub fn descriptor(self) -> &'static ChartDescriptor {
        match self {
            Self::Bar => &BAR,
            Self::Line => &LINE,
            Self::Scatter => &SCATTER,
            Self::Histogram => &HISTOGRAM,
            Self::Boxplot => &BOXPLOT,
            Self::Pie => &PIE,
            Self::StackedBar => &STACKED_BAR,
            Self::Area => &AREA,
            Self::Hexbin => &HEXBIN,
            Self::Violin => &VIOLIN,
            Self::CorrelationMatrix => &CORRELATION_MATRIX,
            Self::PairPlot => &PAIR_PLOT,
            Self::Candlestick => &CANDLESTICK,
            Self::Autocorrelation => &AUTOCORRELATION,
            Self::Lag => &LAG,
            Self::Choropleth => &CHOROPLETH,
            Self::ScatterGeo => &SCATTER_GEO,
            Self::LineGeo => &LINE_GEO,
        }
    }

    #[must_use]
    pub fn name(self) -> &'static str {
        self.descriptor().name
    }
}

impl fmt::Display for ChartKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// What a resolved column is used for inside a figure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SeriesRole {
    X,
    Y,
    Value,
    Label,
    Hue,
    Time,
    Open,
    High,
    Low,
    Close,
    Location,
    Color,
    Latitude,
    Longitude,
    Text,
    Column,
}

/// One positional selector accepted by a chart kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectorSlot {
    pub role: SeriesRole,
    pub required: bool,
    /// Consumes every remaining selector. An optional variadic slot left empty
    /// expands to all numeric columns of the dataset.
    pub variadic: bool,
    pub numeric: bool,
}

impl SelectorSlot {
    const fn one(role: SeriesRole, numeric: bool) -> Self {
        Self {
            role,
            required: true,
            variadic: false,
            numeric,
        }
    }

    const fn optional(role: SeriesRole) -> Self {
        Self {
            role,
            required: false,
            variadic: false,
            numeric: false,
        }
    }

    const fn many(role: SeriesRole, required: bool) -> Self {
        Self {
            role,
            required,
            variadic: true,
            numeric: true,
        }
    }
}

/// Static description of a chart kind that drives generic dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChartDescriptor {
    pub kind: ChartKind,
    pub name: &'static str,
    pub slots: &'static [SelectorSlot],
    pub default_title: &'static str,
    pub default_x_label: Option<&'static str>,
    pub default_y_label: Option<&'static str>,
    pub default_mode: BackendMode,
    pub static_supported: bool,
}

impl ChartDescriptor {
    #[must_use]
    pub fn supports(&self, mode: BackendMode) -> bool {
        match mode {
            BackendMode::Static => self.static_supported,
            BackendMode::Interactive => true,
        }
    }

    /// Number of selectors that must be supplied.
    #[must_use]
    pub fn required_selectors(&self) -> usize {
        self.slots.iter().filter(|slot| slot.required).count()
    }
}

const X_ANY: SelectorSlot = SelectorSlot::one(SeriesRole::X, false);
const X_NUM: SelectorSlot = SelectorSlot::one(SeriesRole::X, true);
const Y_NUM: SelectorSlot = SelectorSlot::one(SeriesRole::Y, true);
const VALUE_NUM: SelectorSlot = SelectorSlot::one(SeriesRole::Value, true);

const XY: &[SelectorSlot] = &[X_ANY, Y_NUM];
const XY_NUMERIC: &[SelectorSlot] = &[X_NUM, Y_NUM];
const SINGLE_VALUE: &[SelectorSlot] = &[VALUE_NUM];
const ALL_NUMERIC: &[SelectorSlot] = &[SelectorSlot::many(SeriesRole::Column, false)];
const SCATTER_SLOTS: &[SelectorSlot] = &[X_NUM, Y_NUM, SelectorSlot::optional(SeriesRole::Hue)];
const PIE_SLOTS: &[SelectorSlot] = &[VALUE_NUM, SelectorSlot::one(SeriesRole::Label, false)];
const STACKED_SLOTS: &[SelectorSlot] = &[X_ANY, SelectorSlot::many(SeriesRole::Y, true)];
const OHLC_SLOTS: &[SelectorSlot] = &[
    SelectorSlot::one(SeriesRole::Time, false),
    SelectorSlot::one(SeriesRole::Open, true),
    SelectorSlot::one(SeriesRole::High, true),
    SelectorSlot::one(SeriesRole::Low, true),
    SelectorSlot::one(SeriesRole::Close, true),
];
const CHOROPLETH_SLOTS: &[SelectorSlot] = &[
    SelectorSlot::one(SeriesRole::Location, false),
    SelectorSlot::one(SeriesRole::Color, true),
];
const SCATTER_GEO_SLOTS: &[SelectorSlot] = &[
    SelectorSlot::one(SeriesRole::Latitude, true),
    SelectorSlot::one(SeriesRole::Longitude, true),
    SelectorSlot::optional(SeriesRole::Text),
];
const LINE_GEO_SLOTS: &[SelectorSlot] = &[
    SelectorSlot::one(SeriesRole::Latitude, true),
    SelectorSlot::one(SeriesRole::Longitude, true),
];

const fn planar(
    kind: ChartKind,
    name: &'static str,
    slots: &'static [SelectorSlot],
    default_title: &'static str,
    default_x_label: Option<&'static str>,
    default_y_label: Option<&'static str>,
) -> ChartDescriptor {
    ChartDescriptor {
        kind,
        name,
        slots,
        default_title,
        default_x_label,
        default_y_label,
        default_mode: BackendMode::Static,
        static_supported: true,
    }
}

const fn interactive_only(
    kind: ChartKind,
    name: &'static str,
    slots: &'static [SelectorSlot],
    default_title: &'static str,
) -> ChartDescriptor {
    ChartDescriptor {
        kind,
        name,
        slots,
        default_title,
        default_x_label: None,
        default_y_label: None,
        default_mode: BackendMode::Interactive,
        static_supported: false,
    }
}

const AXES: (Option<&str>, Option<&str>) = (Some("X-axis"), Some("Y-axis"));

static BAR: ChartDescriptor = planar(ChartKind::Bar, "bar", XY, "Bar Chart", AXES.0, AXES.1);
static LINE: ChartDescriptor = planar(ChartKind::Line, "line", XY, "Line Chart", AXES.0, AXES.1);
static SCATTER: ChartDescriptor = planar(
    ChartKind::Scatter,
    "scatter",
    SCATTER_SLOTS,
    "Scatter Plot",
    AXES.0,
    AXES.1,
);
static HISTOGRAM: ChartDescriptor = planar(
    ChartKind::Histogram,
    "histogram",
    SINGLE_VALUE,
    "Histogram",
    Some("Value"),
    Some("Frequency"),
);
static BOXPLOT: ChartDescriptor = planar(
    ChartKind::Boxplot,
    "boxplot",
    SINGLE_VALUE,
    "Boxplot",
    None,
    Some("Value"),
);
static PIE: ChartDescriptor = planar(
    ChartKind::Pie,
    "pie",
    PIE_SLOTS,
    "Pie Chart",
    None,
    None,
);
static STACKED_BAR: ChartDescriptor = planar(
    ChartKind::StackedBar,
    "stacked-bar",
    STACKED_SLOTS,
    "Stacked Bar Chart",
    AXES.0,
    AXES.1,
);
static AREA: ChartDescriptor = planar(ChartKind::Area, "area", XY, "Area Chart", AXES.0, AXES.1);
static HEXBIN: ChartDescriptor = planar(
    ChartKind::Hexbin,
    "hexbin",
    XY_NUMERIC,
    "Hexbin Plot",
    AXES.0,
    AXES.1,
);
static VIOLIN: ChartDescriptor = planar(
    ChartKind::Violin,
    "violin",
    SINGLE_VALUE,
    "Violin Plot",
    None,
    Some("Value"),
);
static CORRELATION_MATRIX: ChartDescriptor = planar(
    ChartKind::CorrelationMatrix,
    "correlation-matrix",
    ALL_NUMERIC,
    "Correlation Matrix",
    None,
    None,
);
static PAIR_PLOT: ChartDescriptor = planar(
    ChartKind::PairPlot,
    "pair-plot",
    ALL_NUMERIC,
    "Pair Plot",
    None,
    None,
);
static CANDLESTICK: ChartDescriptor = interactive_only(
    ChartKind::Candlestick,
    "candlestick",
    OHLC_SLOTS,
    "Candlestick Chart",
);
static AUTOCORRELATION: ChartDescriptor = planar(
    ChartKind::Autocorrelation,
    "autocorrelation",
    SINGLE_VALUE,
    "Autocorrelation Plot",
    Some("Lag"),
    Some("Autocorrelation"),
);
static LAG: ChartDescriptor = planar(
    ChartKind::Lag,
    "lag",
    SINGLE_VALUE,
    "Lag Plot",
    Some("y(t)"),
    Some("y(t + lag)"),
);
static CHOROPLETH: ChartDescriptor = interactive_only(
    ChartKind::Choropleth,
    "choropleth",
    CHOROPLETH_SLOTS,
    "Choropleth Map",
);
static SCATTER_GEO: ChartDescriptor = interactive_only(
    ChartKind::ScatterGeo,
    "scatter-geo",
    SCATTER_GEO_SLOTS,
    "Geographic Scatter Plot",
);
static LINE_GEO: ChartDescriptor = interactive_only(
    ChartKind::LineGeo,
    "line-geo",
    LINE_GEO_SLOTS,
    "Geographic Line Plot",
);
