pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use crate::config::cli::{CliConfig, Command};

pub use crate::config::StoreConfig;
pub use crate::core::fetcher::{Fetcher, HttpSource};
pub use crate::core::store::StoreHandle;
pub use crate::domain::model::{Payload, RequestEvent, RequestOptions, RequestState};
pub use crate::domain::ports::{DataSource, KeyValue};
pub use crate::utils::error::{DataError, Result};
