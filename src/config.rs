use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use log::{debug, info};
use serde::Deserialize;

use crate::data::model::City;
use crate::error::BikeshareError;

/// Optional configuration file looked up in the working directory.
pub const CONFIG_FILE_NAME: &str = "bikeshare.json";

/// Rows shown in the dataset preview, like a DataFrame `head()`.
pub const DEFAULT_PREVIEW_ROWS: usize = 5;

// ---------------------------------------------------------------------------
// On-disk shape
// ---------------------------------------------------------------------------

/// ```json
/// {
///   "data_dir": "data",
///   "sources": { "chicago": "chicago_2017.parquet" },
///   "preview_rows": 10
/// }
/// ```
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct ConfigFile {
    data_dir: Option<PathBuf>,
    sources: BTreeMap<String, PathBuf>,
    preview_rows: Option<usize>,
}

// ---------------------------------------------------------------------------
// Config – immutable city → data source mapping
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct Config {
    sources: BTreeMap<City, PathBuf>,
    pub preview_rows: usize,
}

impl Config {
    /// Default file names for every city, resolved under `data_dir`.
    pub fn with_data_dir(data_dir: &Path) -> Self {
        Self::from_sources(
            City::ALL
                .into_iter()
                .map(|c| (c, data_dir.join(c.default_file_name())))
                .collect(),
        )
    }

    /// Build a config from explicit sources. Cities left out have no data.
    pub fn from_sources(sources: BTreeMap<City, PathBuf>) -> Self {
        Config {
            sources,
            preview_rows: DEFAULT_PREVIEW_ROWS,
        }
    }

    /// Load `bikeshare.json` from `dir` if present, otherwise use defaults.
    pub fn load(dir: &Path) -> Result<Self> {
        let path = dir.join(CONFIG_FILE_NAME);
        if !path.is_file() {
            debug!("No {CONFIG_FILE_NAME} in {}, using defaults", dir.display());
            return Ok(Self::with_data_dir(dir));
        }

        let text = std::fs::read_to_string(&path)
            .with_context(|| format!("reading {}", path.display()))?;
        let file: ConfigFile = serde_json::from_str(&text)
            .with_context(|| format!("parsing {}", path.display()))?;
        info!("Loaded configuration from {}", path.display());

        Self::from_file(dir, file).with_context(|| format!("in {}", path.display()))
    }

    fn from_file(dir: &Path, file: ConfigFile) -> Result<Self> {
        let data_dir = match file.data_dir {
            Some(d) if d.is_absolute() => d,
            Some(d) => dir.join(d),
            None => dir.to_path_buf(),
        };
        let mut config = Self::with_data_dir(&data_dir);

        for (name, source) in file.sources {
            let city: City = name.parse()?;
            config.sources.insert(city, data_dir.join(source));
        }
        if let Some(rows) = file.preview_rows {
            config.preview_rows = rows;
        }
        Ok(config)
    }

    /// Data file for `city`. A city with no entry is a fail-fast error.
    pub fn source_for(&self, city: City) -> Result<&Path, BikeshareError> {
        self.sources
            .get(&city)
            .map(PathBuf::as_path)
            .ok_or_else(|| BikeshareError::NoDataSource(city.name().to_string()))
    }
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    #[test]
    fn defaults_cover_every_city() {
        let config = Config::with_data_dir(Path::new("data"));
        assert_eq!(
            config.source_for(City::Chicago).unwrap(),
            Path::new("data/chicago.csv")
        );
        assert_eq!(
            config.source_for(City::NewYorkCity).unwrap(),
            Path::new("data/new_york_city.csv")
        );
        assert_eq!(
            config.source_for(City::Washington).unwrap(),
            Path::new("data/washington.csv")
        );
        assert_eq!(config.preview_rows, DEFAULT_PREVIEW_ROWS);
    }

    #[test]
    fn missing_source_is_an_error() {
        let config = Config::from_sources(BTreeMap::new());
        let err = config.source_for(City::Washington).unwrap_err();
        assert!(matches!(err, BikeshareError::NoDataSource(ref c) if c == "washington"));
    }

    #[test]
    fn absent_file_falls_back_to_defaults() {
        let dir = TempDir::new().unwrap();
        let config = Config::load(dir.path()).unwrap();
        assert_eq!(
            config.source_for(City::Chicago).unwrap(),
            dir.path().join("chicago.csv")
        );
    }

    #[test]
    fn file_overrides_sources_and_preview() {
        let dir = TempDir::new().unwrap();
        std::fs::write(
            dir.path().join(CONFIG_FILE_NAME),
            r#"{ "data_dir": "trips", "sources": { "chicago": "chi.parquet" }, "preview_rows": 2 }"#,
        )
        .unwrap();

        let config = Config::load(dir.path()).unwrap();
        let data_dir = dir.path().join("trips");
        assert_eq!(
            config.source_for(City::Chicago).unwrap(),
            data_dir.join("chi.parquet")
        );
        assert_eq!(
            config.source_for(City::Washington).unwrap(),
            data_dir.join("washington.csv")
        );
        assert_eq!(config.preview_rows, 2);
    }

    #[test]
    fn unknown_city_in_file_is_rejected() {
        let dir = TempDir::new().unwrap();
        std::fs::write(
            dir.path().join(CONFIG_FILE_NAME),
            r#"{ "sources": { "boston": "boston.csv" } }"#,
        )
        .unwrap();

        let err = Config::load(dir.path()).unwrap_err();
        assert!(format!("{err:#}").contains("boston"));
    }

    #[test]
    fn malformed_file_is_rejected() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join(CONFIG_FILE_NAME), "{ not json").unwrap();
        assert!(Config::load(dir.path()).is_err());
    }
}
