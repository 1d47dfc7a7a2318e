use treksafer_common::Coordinate;

/// Urgency filter. Numeric level is ordinal (1 = most urgent); "include
/// everything at or below this level" is the filter semantics everywhere
/// else in the system treats these as.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusFilter {
    Active,
    Managed,
    Controlled,
    Out,
    All,
}

impl StatusFilter {
    /// `None` for `All`, which disables status filtering entirely rather
    /// than admitting a fixed maximum level.
    pub fn level(&self) -> Option<u8> {
        match self {
            StatusFilter::Active => Some(1),
            StatusFilter::Managed => Some(2),
            StatusFilter::Controlled => Some(3),
            StatusFilter::Out => Some(4),
            StatusFilter::All => None,
        }
    }

    pub fn default_filter() -> StatusFilter {
        StatusFilter::Controlled
    }

    pub fn parse(s: &str) -> Option<StatusFilter> {
        match s.to_ascii_lowercase().as_str() {
            "active" => Some(StatusFilter::Active),
            "managed" => Some(StatusFilter::Managed),
            "controlled" => Some(StatusFilter::Controlled),
            "out" => Some(StatusFilter::Out),
            "all" => Some(StatusFilter::All),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataType {
    Auto,
    Fire,
    Avalanche,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ForecastFilter {
    Current,
    Today,
    Tomorrow,
    All,
}

impl ForecastFilter {
    pub fn default_filter() -> ForecastFilter {
        ForecastFilter::Current
    }
}

/// The parsed shape of one inbound message: a required coordinate plus
/// whichever filter directives were present (all have documented defaults,
/// applied later by the router -- this type only records what the text
/// actually said).
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedRequest {
    pub coords: Coordinate,
    pub status: Option<StatusFilter>,
    pub distance_km: Option<f64>,
    pub data_type: DataType,
    pub forecast: Option<ForecastFilter>,
}
