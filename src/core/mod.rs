pub mod fetcher;
pub mod store;

pub use crate::domain::model::{Payload, RequestEvent, RequestOptions, RequestState};
pub use crate::domain::ports::{DataSource, KeyValue};
pub use crate::utils::error::Result;
