//! Delivery personnel resource.
//!
//! This module defines the data types exchanged with the delivery API and the
//! [`DeliveryBackend`] trait describing the operations available on them.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::api::ApiError;

/// HTTP implementation of [`DeliveryBackend`]
pub mod service;

pub use service::DeliveryService;

/// A person who delivers orders.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DeliveryPerson {
    /// Server-assigned identifier, absent before creation
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    /// National identification number
    pub identification: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active: Option<bool>,
}

/// Fields sent when creating or updating a delivery person. Unset fields are
/// left out of the request body.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct DeliveryPersonArgs {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub identification: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub active: Option<bool>,
}

/// Per-deliverer line of a delivery report
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DeliverySummary {
    pub name: String,
    pub total: f64,
    pub count: u64,
}

/// Aggregated deliveries over a date range, computed by the server.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct DeliveryReport {
    pub total: f64,
    pub count: u64,
    #[serde(default)]
    pub summary: Vec<DeliverySummary>,
    /// Orders included in the report, kept as raw JSON
    #[serde(default)]
    pub orders: Vec<serde_json::Value>,
}

/// Query parameters of the delivery report endpoint
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportQuery<'a> {
    pub start_date: &'a str,
    pub end_date: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delivery_person_id: Option<&'a str>,
}

/// Operations on the delivery personnel resource.
///
/// Each call performs a single request. Failures are returned unchanged from
/// the transport; there are no retries.
#[async_trait]
pub trait DeliveryBackend: Send + Sync {
    /// List all delivery personnel
    async fn get_personnel(&self) -> Result<Vec<DeliveryPerson>, ApiError>;

    /// Create a delivery person
    async fn create_person(&self, args: &DeliveryPersonArgs) -> Result<DeliveryPerson, ApiError>;

    /// Update the given fields of a delivery person
    async fn update_person(&self, id: &str, args: &DeliveryPersonArgs) -> Result<DeliveryPerson, ApiError>;

    /// Soft-delete a delivery person
    async fn delete_person(&self, id: &str) -> Result<(), ApiError>;

    /// Fetch the delivery report for a date range, optionally for one person
    async fn get_report(
        &self,
        start_date: &str,
        end_date: &str,
        person_id: Option<&str>,
    ) -> Result<DeliveryReport, ApiError>;
}
