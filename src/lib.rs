//! Delivery Desk - client utilities for a delivery operations API
//!
//! # Modules
//!
//! * [`api`] - HTTP transport and the `{ "data": ... }` response envelope
//! * [`config`] - Application configuration management
//! * [`delivery`] - Delivery personnel service and report types
//! * [`image`] - Product image resolution with placeholder fallback
//! * [`state`] - Observable values for binding views to state
//! * [`utils`] - Date helpers fixed to Ecuador time (UTC-5)

/// HTTP client shared by the services
pub mod api;

/// Configuration module for managing application settings
pub mod config;

/// Application constants and default values
pub mod constants;

/// Delivery personnel resource and its HTTP service
pub mod delivery;

/// Image probing, caching and display state
pub mod image;

/// Logging setup and in-memory log buffer
pub mod logger;

/// Observable state holders
pub mod state;

/// Utility functions for date/time handling
pub mod utils;

pub use delivery::{DeliveryBackend, DeliveryPerson, DeliveryPersonArgs, DeliveryReport, DeliveryService};
pub use image::{ImageCache, ProductImage};
