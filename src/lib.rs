pub mod config;
pub mod enums;
pub mod error;
pub mod models;
pub mod gateways;
pub mod store;
pub mod patterns;
pub mod services;
pub mod alert_checker;

pub use config::Config;
pub use enums::{AlertDirection, AlertKind, PatternDirection, PatternType, TrendDirection};
pub use error::{AppError, Result};
