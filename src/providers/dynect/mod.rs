//! Dynect Managed DNS provider implementation

pub mod client;
pub mod error;
pub mod types;


pub use client::{DynectClient, DynectConfig};
pub use error::DynectError;

use async_trait::async_trait;
use log::{debug, info};
use reqwest::Method;

use crate::core::provider::DnsProvider;
use crate::error::Error;
use error::map_error;
use types::{JobStatus, PublishRequest, ResponseEnvelope, UpdateRecordRequest};

#[derive(Debug)]
pub struct DynectProvider {
    client: DynectClient,
}

impl DynectProvider {
    /// Builds the session client and logs in; the provider is only handed
    /// out with an established session.
    pub async fn new(
        config: DynectConfig,
        customer: &str,
        user: &str,
        password: &str,
    ) -> Result<Self, DynectError> {
        let mut client = DynectClient::new(config)?;
        client.login(customer, user, password).await?;
        Ok(Self { client })
    }

    async fn set_a_record(&self, zone: &str, fqdn: &str, ip: &str) -> Result<(), DynectError> {
        let request = UpdateRecordRequest::new(ip, 0);
        let path = format!("ARecord/{zone}/{fqdn}/");
        let body = self
            .client
            .request(Method::PUT, &path, Some(&request))
            .await?;
        let envelope: ResponseEnvelope = serde_json::from_slice(&body)?;
        if envelope.status != JobStatus::Success {
            return Err(DynectError::Api(format!(
                "setting A record failed: {}",
                String::from_utf8_lossy(&body)
            )));
        }
        Ok(())
    }

    async fn delete_cname(&self, zone: &str, fqdn: &str) -> Result<(), DynectError> {
        let path = format!("CNAMERecord/{zone}/{fqdn}/");
        let body = self
            .client
            .request::<()>(Method::DELETE, &path, None)
            .await?;
        let envelope: ResponseEnvelope = serde_json::from_slice(&body)?;
        if envelope.status != JobStatus::Success {
            return Err(DynectError::Api(format!(
                "can't delete CNAME entry for {fqdn}: {}",
                String::from_utf8_lossy(&body)
            )));
        }
        Ok(())
    }

    async fn publish_changes(&self, zone: &str) -> Result<(), DynectError> {
        let path = format!("Zone/{zone}");
        self.client
            .execute(Method::PUT, &path, Some(&PublishRequest::new()))
            .await
            .map_err(|e| match e {
                DynectError::Api(msg) => {
                    DynectError::Api(format!("publishing changes failed: {msg}"))
                }
                e => e,
            })
    }
}

#[async_trait]
impl DnsProvider for DynectProvider {
    fn name(&self) -> &str {
        "dynect"
    }

    /// Set the record, optionally fall back to deleting a conflicting
    /// CNAME, then publish the zone. The result is always the outcome of
    /// the last step taken: a failed delete fallback replaces the set
    /// error, and once publish is reached its result is what the caller
    /// sees.
    async fn update_a_record(
        &self,
        zone: &str,
        fqdn: &str,
        ip: &str,
        force: bool,
    ) -> Result<(), Error> {
        if let Err(err) = self.set_a_record(zone, fqdn, ip).await {
            if !force {
                return Err(map_error(err));
            }
            debug!("setting A record for {fqdn} failed ({err}), deleting CNAME");
            self.delete_cname(zone, fqdn).await.map_err(map_error)?;
        }
        self.publish_changes(zone).await.map_err(map_error)?;
        info!("published zone {zone} with A record {fqdn} -> {ip}");
        Ok(())
    }
}
