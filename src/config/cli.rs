use crate::config::StoreConfig;
use crate::domain::model::RequestOptions;
use crate::utils::error::{DataError, Result};
use crate::utils::validation::{validate_url, Validate};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Clone, Parser)]
#[command(name = "small-data")]
#[command(about = "A small data-access toolkit: HTTP fetching and an embedded key-value store")]
pub struct CliConfig {
    #[command(subcommand)]
    pub command: Command,

    #[arg(long, default_value = "./data/small-data.redb")]
    pub db_path: PathBuf,

    #[arg(long, default_value = "records")]
    pub collection: String,

    #[arg(long, default_value = "1")]
    pub db_version: u64,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Fetch a URL and print the decoded payload
    Fetch {
        url: String,
        #[arg(long, default_value = "GET")]
        method: String,
        /// Request headers as name:value pairs
        #[arg(long = "header")]
        headers: Vec<String>,
        #[arg(long)]
        body: Option<String>,
    },
    /// Read the value stored under a key
    Get { key: String },
    /// Store a JSON value under a key
    Put { key: String, value: String },
    /// Delete the value stored under a key
    Del { key: String },
    /// Store a JSON value under the next auto-incremented key
    Append { value: String },
}

impl CliConfig {
    pub fn store_config(&self) -> StoreConfig {
        StoreConfig {
            path: self.db_path.clone(),
            collection: self.collection.clone(),
            version: self.db_version,
        }
    }
}

impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        self.store_config().validate()?;
        if let Command::Fetch { url, headers, .. } = &self.command {
            validate_url("url", url)?;
            for header in headers {
                parse_header(header)?;
            }
        }
        Ok(())
    }
}

pub fn parse_header(raw: &str) -> Result<(String, String)> {
    match raw.split_once(':') {
        Some((name, value)) if !name.trim().is_empty() => {
            Ok((name.trim().to_string(), value.trim().to_string()))
        }
        _ => Err(DataError::InvalidConfigValueError {
            field: "header".to_string(),
            value: raw.to_string(),
            reason: "Expected name:value".to_string(),
        }),
    }
}

pub fn request_options(method: &str, headers: &[String], body: Option<&str>) -> Result<RequestOptions> {
    let headers = headers
        .iter()
        .map(|raw| parse_header(raw))
        .collect::<Result<Vec<_>>>()?;
    Ok(RequestOptions {
        method: method.to_uppercase(),
        headers,
        body: body.map(str::to_string),
    })
}
