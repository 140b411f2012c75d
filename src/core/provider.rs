use crate::error::Error;
use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;

/// Capability interface for DNS backends able to point an A record at an IP.
///
/// `force` opts into deleting a conflicting CNAME at the same name when the
/// record update fails, before publishing the zone.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait DnsProvider: Send + Sync {
    #[allow(dead_code)]
    fn name(&self) -> &str;
    async fn update_a_record(
        &self,
        zone: &str,
        fqdn: &str,
        ip: &str,
        force: bool,
    ) -> Result<(), Error>;
}
