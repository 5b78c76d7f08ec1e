//! Coach library for the learning insight service
//!
//! This crate provides the core functionality for:
//! - Feature extraction from user activity records
//! - The five predictive models behind the `Model` trait
//! - Insight aggregation with a context-only fallback path
//! - User activity data sources
//! - Health checks and observability

pub mod datasource;
pub mod error;
pub mod features;
pub mod health;
pub mod insights;
pub mod models;
pub mod observability;
pub mod predictor;

pub use error::{InsightsError, PredictionError};
pub use health::{
    ComponentHealth, ComponentStatus, HealthRegistry, HealthResponse, ReadinessResponse,
};
pub use models::*;
pub use observability::{CoachMetrics, StructuredLogger};
