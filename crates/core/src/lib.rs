pub mod config;
pub mod error;
pub mod timestamp;
pub mod types;

pub use config::AppConfig;
pub use error::{CrmError, CrmResult};
pub use timestamp::resolve_timestamp;
