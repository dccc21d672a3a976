pub mod alert_service;
pub mod pattern_service;

pub use alert_service::{AlertService, CreateAlertRequest, NewAlertCondition, UpdateAlertRequest};
pub use pattern_service::PatternService;
