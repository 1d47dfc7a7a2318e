use std::collections::HashMap;
use std::path::PathBuf;

use indexmap::IndexMap;
use serde::Deserialize;

/// One row source: a shapefile-backed region (country, province, national forest)
/// plus the field mapping that normalizes its native attribute schema.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DataSource {
    /// Directory under `shapefiles` holding this source's perimeter files.
    pub location: String,
    /// Glob matched against files in `location`, with a `{DATE}` placeholder
    /// replaced by `*`; the lexically greatest match is the active perimeter
    /// set (dates are zero-padded `YYYYMMDD`, so lexical order is chronological).
    pub filename: String,
    pub mapping: FieldMapping,
    /// Optional remote enrichment called per-record after mapping.
    #[serde(default)]
    pub enrichment: Option<ApiEnrichment>,
    /// Optional URL this source is re-downloaded from by the refresh job.
    #[serde(default)]
    pub refresh_url: Option<String>,
}

/// Column name translation from a shapefile's native attribute table into the
/// normalized `Fire`/`Name`/`Location`/`Size`/`Status` keys, plus optional
/// per-key value transforms and a status vocabulary translation.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FieldMapping {
    /// Normalized key (`Fire`, `Name`, `Location`, `Size`, `Status`, or a
    /// source-specific extra) -> raw shapefile attribute name.
    pub fields: HashMap<String, String>,
    /// Normalized key -> named transform (currently only `acres_to_hectares`).
    #[serde(default)]
    pub transforms: HashMap<String, String>,
    /// One of `active`/`managed`/`controlled`/`out` -> the native status
    /// strings this source uses for that category, for sources whose status
    /// vocabulary doesn't already match ours. A category may list several
    /// raw strings (e.g. `managed: [Flanking, HOLDING]`).
    #[serde(default)]
    pub status_map: HashMap<String, Vec<String>>,
}

/// A templated GET call used to enrich a record with a field the shapefile's
/// attribute table doesn't carry. `url_template` may reference any already-
/// mapped field as `{field_name}`; interpolated values are restricted to a
/// printable-ASCII allowlist before substitution.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ApiEnrichment {
    pub url_template: String,
    /// Normalized key -> field name to read out of the JSON response.
    pub fields: HashMap<String, String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AvalancheProviderConfig {
    pub provider: String,
    pub api_base: String,
    #[serde(default = "default_lang")]
    pub lang: String,
    #[serde(default)]
    pub subregions: Option<String>,
    /// Local hour of day after which `current` means "tomorrow's forecast".
    #[serde(default = "default_forecast_cutoff_hour")]
    pub forecast_cutoff_hour: u32,
}

fn default_lang() -> String {
    "en".to_string()
}

fn default_forecast_cutoff_hour() -> u32 {
    16
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AvalancheSettings {
    /// Keyed by region code; an `IndexMap` so provider selection can fall
    /// back to declaration order when more than one provider's boundary
    /// contains the requested point.
    pub providers: IndexMap<String, AvalancheProviderConfig>,
    #[serde(default = "default_avalanche_distance_buffer")]
    pub distance_buffer: f64,
}

fn default_avalanche_distance_buffer() -> f64 {
    25.0
}

/// One configured inbound channel. Tagged on `type`, mirroring the closed set
/// of transports the runtime actually wires up (component K).
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase", deny_unknown_fields)]
pub enum TransportConfig {
    Cli {
        #[serde(default = "default_cli_host")]
        host: String,
        #[serde(default = "default_cli_port")]
        port: u16,
        enabled: bool,
    },
    Sms {
        project_id: String,
        api_token: String,
        phone_number: String,
        enabled: bool,
    },
}

fn default_cli_host() -> String {
    "localhost".to_string()
}

fn default_cli_port() -> u16 {
    8888
}

impl TransportConfig {
    pub fn enabled(&self) -> bool {
        match self {
            TransportConfig::Cli { enabled, .. } => *enabled,
            TransportConfig::Sms { enabled, .. } => *enabled,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            TransportConfig::Cli { .. } => "cli",
            TransportConfig::Sms { .. } => "sms",
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RefreshJobConfig {
    #[serde(default = "default_refresh_interval_hours")]
    pub interval_hours: u64,
    #[serde(default = "default_download_timeout")]
    pub download_timeout_secs: u64,
}

fn default_refresh_interval_hours() -> u64 {
    24
}

fn default_download_timeout() -> u64 {
    600
}

impl Default for RefreshJobConfig {
    fn default() -> Self {
        RefreshJobConfig {
            interval_hours: default_refresh_interval_hours(),
            download_timeout_secs: default_download_timeout(),
        }
    }
}

/// Process-wide, read-only settings. Loaded once at startup (see
/// [`crate::loader::load`]) and handed out as `Arc<Settings>` to every
/// component that needs it.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Settings {
    #[serde(default = "default_env")]
    pub env: String,

    #[serde(default = "default_fire_radius")]
    pub fire_radius: f64,
    #[serde(default = "default_max_radius")]
    pub max_radius: f64,
    #[serde(default = "default_fire_status")]
    pub fire_status: String,
    #[serde(default)]
    pub fire_size: f64,
    #[serde(default)]
    pub include_aqi: bool,

    pub avalanche: AvalancheSettings,

    pub data: Vec<DataSource>,
    #[serde(default = "default_shapefiles")]
    pub shapefiles: String,
    #[serde(default)]
    pub boundaries: BoundarySettings,

    #[serde(default)]
    pub transports: Vec<TransportConfig>,

    #[serde(default)]
    pub refresh: RefreshJobConfig,

    #[serde(default)]
    pub log_file: Option<String>,
    #[serde(default = "default_log_level")]
    pub log_level: String,

    #[serde(default = "default_request_cache_timeout")]
    pub request_cache_timeout: u64,
    #[serde(default = "default_http_timeout")]
    pub http_timeout_secs: u64,
}

fn default_env() -> String {
    "prod".to_string()
}

fn default_fire_radius() -> f64 {
    100.0
}

fn default_max_radius() -> f64 {
    500.0
}

fn default_fire_status() -> String {
    "active".to_string()
}

fn default_shapefiles() -> String {
    "shapefiles".to_string()
}

/// Fixed boundary layers `sources_for` and the avalanche dispatcher query
/// against, as distinct from the per-source wildfire perimeter shapefiles.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BoundarySettings {
    #[serde(default = "default_countries_path")]
    pub countries: String,
    #[serde(default = "default_canada_provinces_path")]
    pub canada_provinces: String,
    #[serde(default = "default_canadian_subregions_path")]
    pub canadian_subregions: String,
}

fn default_countries_path() -> String {
    "boundaries/countries.zip".to_string()
}

fn default_canada_provinces_path() -> String {
    "boundaries/canada_provinces.zip".to_string()
}

fn default_canadian_subregions_path() -> String {
    "boundaries/canadian_subregions.shp.zip".to_string()
}

impl Default for BoundarySettings {
    fn default() -> Self {
        BoundarySettings {
            countries: default_countries_path(),
            canada_provinces: default_canada_provinces_path(),
            canadian_subregions: default_canadian_subregions_path(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_request_cache_timeout() -> u64 {
    14_400
}

fn default_http_timeout() -> u64 {
    30
}

impl Settings {
    /// `logs/<env>.log` unless overridden explicitly.
    pub fn log_file_path(&self) -> PathBuf {
        match &self.log_file {
            Some(path) => PathBuf::from(path),
            None => PathBuf::from("logs").join(format!("{}.log", self.env)),
        }
    }

    pub fn enabled_transports(&self) -> impl Iterator<Item = &TransportConfig> {
        self.transports.iter().filter(|t| t.enabled())
    }
}
