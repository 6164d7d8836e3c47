//! Query layer, risk scoring and report assembly for the employee events
//! dashboard.

pub mod components;
pub mod config;
pub mod entities;
pub mod error;
pub mod report;
pub mod risk;
pub mod store;
pub mod telemetry;
