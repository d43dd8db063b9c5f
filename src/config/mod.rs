#[cfg(feature = "cli")]
pub mod cli;

use crate::utils::error::Result;
use crate::utils::validation::{validate_non_empty_string, validate_positive_number, Validate};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    pub path: PathBuf,
    pub collection: String,
    pub version: u64,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("./data/small-data.redb"),
            collection: "records".to_string(),
            version: 1,
        }
    }
}

impl Validate for StoreConfig {
    fn validate(&self) -> Result<()> {
        validate_non_empty_string("collection", &self.collection)?;
        validate_positive_number("version", self.version, 1)?;
        Ok(())
    }
}
