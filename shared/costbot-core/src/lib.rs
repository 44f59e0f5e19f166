//! Cost Bot Core - Shared service infrastructure
//!
//! This crate provides:
//! - Error taxonomy shared by every component of the bot
//! - Environment configuration
//! - Tracing initialisation
//! - Service lifecycle trait and runtime for the local HTTP mode

pub mod config;
pub mod error;
pub mod service;
pub mod telemetry;

pub use config::BotConfig;
pub use error::{CostBotError, Result};
pub use service::{BotService, DependencyStatus, HealthStatus, ReadinessStatus, ServiceRuntime};
pub use telemetry::TelemetryConfig;
