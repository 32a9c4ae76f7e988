use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::candidates::TableColumns;
use crate::error::Result;

pub const DEFAULT_RADIUS_M: u32 = 50_000;
pub const DEFAULT_LIMIT: u32 = 100;

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct Config {
    pub postcodes: PostcodesConfig,
    pub routing: RoutingConfig,
    pub search: SearchConfig,
    pub table: TableConfig,
}

/// postcodes.io lookup + reverse search
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct PostcodesConfig {
    pub base_url: String,
    pub timeout_secs: u64,
}

/// OpenRouteService isochrones
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct RoutingConfig {
    pub base_url: String,
    pub profile: String,
    pub timeout_secs: u64,
    pub api_key: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct SearchConfig {
    pub radius_m: u32,
    pub limit: u32,
}

/// Local outcode table and its header names
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct TableConfig {
    pub path: Option<PathBuf>,
    pub label_column: String,
    pub latitude_column: String,
    pub longitude_column: String,
}

impl Default for PostcodesConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.postcodes.io".to_string(),
            timeout_secs: 30,
        }
    }
}

impl Default for RoutingConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.openrouteservice.org".to_string(),
            profile: "driving-car".to_string(),
            timeout_secs: 60,
            api_key: None,
        }
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            radius_m: DEFAULT_RADIUS_M,
            limit: DEFAULT_LIMIT,
        }
    }
}

impl Default for TableConfig {
    fn default() -> Self {
        let columns = TableColumns::default();
        Self {
            path: None,
            label_column: columns.label,
            latitude_column: columns.latitude,
            longitude_column: columns.longitude,
        }
    }
}

impl TableConfig {
    pub fn columns(&self) -> TableColumns {
        TableColumns {
            label: self.label_column.clone(),
            latitude: self.latitude_column.clone(),
            longitude: self.longitude_column.clone(),
        }
    }
}

impl PostcodesConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl RoutingConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Config {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_file_uses_defaults() {
        let config = Config::from_toml("").unwrap();
        assert_eq!(config.postcodes.base_url, "https://api.postcodes.io");
        assert_eq!(config.routing.profile, "driving-car");
        assert_eq!(config.search.radius_m, 50_000);
        assert_eq!(config.search.limit, 100);
        assert!(config.table.path.is_none());
        assert_eq!(config.table.label_column, "outcode");
        assert_eq!(config.table.latitude_column, "latitude");
        assert_eq!(config.table.longitude_column, "longitude");
    }

    #[test]
    fn test_partial_sections() {
        let config = Config::from_toml(
            r#"
            [routing]
            api_key = "secret"
            profile = "driving-hgv"

            [search]
            limit = 25

            [table]
            path = "uk_outcodes.csv"
        "#,
        )
        .unwrap();

        assert_eq!(config.routing.api_key.as_deref(), Some("secret"));
        assert_eq!(config.routing.profile, "driving-hgv");
        assert_eq!(config.routing.timeout_secs, 60);
        assert_eq!(config.search.limit, 25);
        assert_eq!(config.search.radius_m, 50_000);
        assert_eq!(config.table.path, Some(PathBuf::from("uk_outcodes.csv")));
    }

    #[test]
    fn test_table_column_names() {
        let config = Config::from_toml(
            r#"
            [table]
            path = "districts.csv"
            label_column = "district"
            latitude_column = "lat"
        "#,
        )
        .unwrap();

        let columns = config.table.columns();
        assert_eq!(columns.label, "district");
        assert_eq!(columns.latitude, "lat");
        assert_eq!(columns.longitude, "longitude");

        let data = "district,lat,longitude\nSW1A,51.501,-0.1416\n";
        let table =
            crate::candidates::TableSupplier::from_reader(data.as_bytes(), &columns).unwrap();
        assert_eq!(table.rows()[0].label, "SW1A");
    }

    #[test]
    fn test_example_file_parses() {
        let config = Config::from_toml(include_str!("../isoreach.example.toml")).unwrap();
        assert_eq!(config.postcodes.timeout_secs, 30);
        assert!(config.routing.api_key.is_none());
        assert_eq!(config.table.label_column, "outcode");
    }

    #[test]
    fn test_bad_toml_is_config_error() {
        let err = Config::from_toml("[search]\nlimit = \"many\"").unwrap_err();
        assert!(matches!(err, crate::Error::Config(_)));
    }
}
