use std::fmt;

use futures_util::future::try_join5;
use tracing::{debug, info};

use crate::category::CategoryDimension;
use crate::geo::{GeoError, GeoFeature, parse_feature_collection};
use crate::geo_filter::filter_by_latitude;
use crate::manifest::DatasetManifest;
use crate::source::{ResourceSource, SourceError};
use crate::tables::{
    HealthRow, Observation, PeriodTable, TableError, UnemploymentRow, parse_health,
    parse_observations, parse_period_table, parse_unemployment,
};

/// Everything a story needs, loaded once and shared read-only by all scenes.
#[derive(Debug, Clone, PartialEq)]
pub struct DataBundle {
    pub immigration: PeriodTable,
    pub housing: Vec<Observation>,
    pub unemployment: Vec<UnemploymentRow>,
    pub health: Vec<HealthRow>,
    pub boundaries: Vec<GeoFeature>,
    pub dimension: CategoryDimension,
}

#[derive(Debug, Clone)]
pub struct LoadOptions {
    /// Drops boundary polygons lying entirely at or above this latitude.
    pub latitude_limit: Option<f64>,
    pub dimension: CategoryDimension,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            latitude_limit: Some(75.0),
            dimension: CategoryDimension::canadian_provinces(),
        }
    }
}

/// Raw resource text, one field per manifest entry.
#[derive(Debug, Clone, Default)]
pub struct Payloads {
    pub immigration: String,
    pub housing: String,
    pub unemployment: String,
    pub health: String,
    pub boundaries: String,
}

#[derive(Debug)]
pub enum DataLoadError {
    Fetch(SourceError),
    Table { resource: &'static str, source: TableError },
    Geo { resource: &'static str, source: GeoError },
}

impl fmt::Display for DataLoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataLoadError::Fetch(e) => write!(f, "failed to fetch {e}"),
            DataLoadError::Table { resource, source } => {
                write!(f, "failed to parse {resource} table: {source}")
            }
            DataLoadError::Geo { resource, source } => {
                write!(f, "failed to parse {resource} boundaries: {source}")
            }
        }
    }
}

impl std::error::Error for DataLoadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DataLoadError::Fetch(e) => Some(e),
            DataLoadError::Table { source, .. } => Some(source),
            DataLoadError::Geo { source, .. } => Some(source),
        }
    }
}

fn table_err(resource: &'static str) -> impl FnOnce(TableError) -> DataLoadError {
    move |source| DataLoadError::Table { resource, source }
}

/// Fetches all five resources concurrently and normalizes them.
///
/// Fails on the first fetch or parse error; nothing is partially loaded.
pub async fn load(
    source: &dyn ResourceSource,
    manifest: &DatasetManifest,
    options: &LoadOptions,
) -> Result<DataBundle, DataLoadError> {
    let paths = &manifest.resources;
    info!(source = %source.describe(), "loading story data");

    let (immigration, housing, unemployment, health, boundaries) = try_join5(
        source.fetch(&paths.immigration),
        source.fetch(&paths.housing),
        source.fetch(&paths.unemployment),
        source.fetch(&paths.health),
        source.fetch(&paths.boundaries),
    )
    .await
    .map_err(DataLoadError::Fetch)?;

    DataBundle::from_payloads(
        &Payloads {
            immigration,
            housing,
            unemployment,
            health,
            boundaries,
        },
        options,
    )
}

impl DataBundle {
    /// Bundle with no rows; starting point for fixtures and embedders that
    /// fill tables in code.
    pub fn empty(dimension: CategoryDimension) -> Self {
        Self {
            immigration: PeriodTable::default(),
            housing: Vec::new(),
            unemployment: Vec::new(),
            health: Vec::new(),
            boundaries: Vec::new(),
            dimension,
        }
    }

    pub fn from_payloads(payloads: &Payloads, options: &LoadOptions) -> Result<Self, DataLoadError> {
        let immigration =
            parse_period_table(&payloads.immigration).map_err(table_err("immigration"))?;
        let housing = parse_observations(&payloads.housing).map_err(table_err("housing"))?;
        let unemployment =
            parse_unemployment(&payloads.unemployment).map_err(table_err("unemployment"))?;
        let health = parse_health(&payloads.health).map_err(table_err("health"))?;

        let mut boundaries = parse_feature_collection(&payloads.boundaries).map_err(|source| {
            DataLoadError::Geo {
                resource: "boundaries",
                source,
            }
        })?;
        if let Some(limit) = options.latitude_limit {
            let before = boundaries.len();
            boundaries = boundaries
                .into_iter()
                .filter_map(|f| filter_by_latitude(f, limit))
                .collect();
            debug!(limit, before, after = boundaries.len(), "filtered boundaries by latitude");
        }

        debug!(
            periods = immigration.records.len(),
            housing = housing.len(),
            unemployment = unemployment.len(),
            health = health.len(),
            features = boundaries.len(),
            "story data normalized"
        );

        Ok(Self {
            immigration,
            housing,
            unemployment,
            health,
            boundaries,
            dimension: options.dimension.clone(),
        })
    }

    pub fn feature(&self, name: &str) -> Option<&GeoFeature> {
        let key = crate::category::normalize_name(name);
        self.boundaries.iter().find(|f| f.join_key() == key)
    }
}
