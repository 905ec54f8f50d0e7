//! Delivery personnel service over the HTTP API.

use async_trait::async_trait;
use log::info;
use reqwest::Url;
use serde_json::json;

use super::{DeliveryBackend, DeliveryPerson, DeliveryPersonArgs, DeliveryReport, ReportQuery};
use crate::api::{ApiClient, ApiError};
use crate::constants::{ENDPOINT_DELIVERY_REPORT, ENDPOINT_PERSONNEL};

/// Delivery personnel client backed by [`ApiClient`].
#[derive(Clone, Debug)]
pub struct DeliveryService {
    client: ApiClient,
}

impl DeliveryService {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    /// `delivery-personnel/{id}[/action]` with the id kept as one segment
    fn person_url(&self, id: &str, action: Option<&str>) -> Result<Url, ApiError> {
        match action {
            Some(action) => self.client.endpoint_with(ENDPOINT_PERSONNEL, &[id, action]),
            None => self.client.endpoint_with(ENDPOINT_PERSONNEL, &[id]),
        }
    }
}

#[async_trait]
impl DeliveryBackend for DeliveryService {
    async fn get_personnel(&self) -> Result<Vec<DeliveryPerson>, ApiError> {
        let personnel: Vec<DeliveryPerson> = self.client.get(self.client.endpoint(ENDPOINT_PERSONNEL)?).await?;
        info!("Fetched {} delivery personnel", personnel.len());
        Ok(personnel)
    }

    async fn create_person(&self, args: &DeliveryPersonArgs) -> Result<DeliveryPerson, ApiError> {
        let person: DeliveryPerson = self.client.post(self.client.endpoint(ENDPOINT_PERSONNEL)?, args).await?;
        info!("Created delivery person {:?}", person.id);
        Ok(person)
    }

    async fn update_person(&self, id: &str, args: &DeliveryPersonArgs) -> Result<DeliveryPerson, ApiError> {
        let person: DeliveryPerson = self.client.put(self.person_url(id, None)?, args).await?;
        info!("Updated delivery person {}", id);
        Ok(person)
    }

    async fn delete_person(&self, id: &str) -> Result<(), ApiError> {
        let url = self.person_url(id, Some("delete"))?;
        self.client.post_unit(url, &json!({})).await?;
        info!("Deleted delivery person {}", id);
        Ok(())
    }

    async fn get_report(
        &self,
        start_date: &str,
        end_date: &str,
        person_id: Option<&str>,
    ) -> Result<DeliveryReport, ApiError> {
        let query = ReportQuery {
            start_date,
            end_date,
            delivery_person_id: person_id,
        };

        let url = self.client.endpoint(ENDPOINT_DELIVERY_REPORT)?;
        let report: DeliveryReport = self.client.get_with_query(url, &query).await?;
        info!(
            "Fetched delivery report {}..{}: {} deliveries",
            start_date, end_date, report.count
        );
        Ok(report)
    }
}
