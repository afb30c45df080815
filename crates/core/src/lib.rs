pub mod catalog;
pub mod config;
pub mod constraint;
pub mod domain;
pub mod reconcile;

pub use catalog::{Catalog, CatalogError};
pub use config::{AppConfig, ConfigError, LlmProvider, LoadOptions, LogFormat};
pub use constraint::{Constraint, ConstraintExtractor, NOISE_CANCEL_HINT};
pub use domain::product::{Category, Product, ProductId};
pub use reconcile::{reconcile, ParseMode, ReconcileOutcome, Reconciliation};
