use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Rows per page in the predictions table.
pub const DEFAULT_PAGE_SIZE: usize = 50;

// ---------------------------------------------------------------------------
// Histogram bin edges for the feature-analysis charts
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BinConfig {
    pub loan_amount: Vec<f64>,
    pub income: Vec<f64>,
    pub interest_rate: Vec<f64>,
    pub age: Vec<f64>,
}

impl Default for BinConfig {
    fn default() -> Self {
        Self {
            loan_amount: vec![
                0.0, 5_000.0, 10_000.0, 15_000.0, 20_000.0, 25_000.0, 30_000.0, 35_000.0,
            ],
            income: vec![
                0.0, 20_000.0, 40_000.0, 60_000.0, 80_000.0, 100_000.0, 150_000.0, 200_000.0,
            ],
            interest_rate: vec![5.0, 7.0, 9.0, 11.0, 13.0, 15.0, 17.0, 19.0],
            age: vec![
                20.0, 25.0, 30.0, 35.0, 40.0, 45.0, 50.0, 55.0, 60.0, 65.0, 70.0,
            ],
        }
    }
}

impl BinConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        let sets: [(&'static str, &[f64]); 4] = [
            ("loan_amount", &self.loan_amount),
            ("income", &self.income),
            ("interest_rate", &self.interest_rate),
            ("age", &self.age),
        ];
        for (name, edges) in sets {
            if edges.len() < 2 || edges.windows(2).any(|w| w[0] >= w[1]) {
                return Err(ConfigError::InvalidBins { name });
            }
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// DashboardConfig
// ---------------------------------------------------------------------------

/// Tunables for the record table and feature charts. Every field is optional
/// in the JSON form; missing fields take the defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    pub page_size: usize,
    pub bins: BinConfig,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            bins: BinConfig::default(),
        }
    }
}

impl DashboardConfig {
    /// Read and validate a JSON config file.
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: DashboardConfig =
            serde_json::from_str(&text).map_err(|source| ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.page_size == 0 {
            return Err(ConfigError::ZeroPageSize);
        }
        self.bins.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn partial_json_keeps_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "page_size": 25, "bins": {{ "age": [18, 40, 80] }} }}"#).unwrap();

        let config = DashboardConfig::from_path(file.path()).unwrap();
        assert_eq!(config.page_size, 25);
        assert_eq!(config.bins.age, vec![18.0, 40.0, 80.0]);
        assert_eq!(config.bins.income, BinConfig::default().income);
    }

    #[test]
    fn rejects_descending_edges_and_zero_page_size() {
        let mut config = DashboardConfig::default();
        config.bins.interest_rate = vec![10.0, 5.0];
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidBins { name: "interest_rate" })
        ));

        let config = DashboardConfig {
            page_size: 0,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::ZeroPageSize)));
    }

    #[test]
    fn missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = DashboardConfig::from_path(&dir.path().join("nope.json")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
