//! Compliance decision engine for UK landlord legal products.
//!
//! The engine takes case facts collected by an external wizard, a
//! jurisdiction, a product, and a stage, and decides which legal routes are
//! available, which are blocked and on what statutory basis, and which
//! grounds to recommend. Rule sets are declarative documents; the hosting
//! service in `services/api` exposes the engine over HTTP and a CLI.

pub mod config;
pub mod engine;
pub mod error;
pub mod telemetry;
