//! Route 53 DNS client

use crate::error::{build_error, from_sdk, owned, slice, truthy};
use async_trait::async_trait;
use aws_sdk_route53::Client;
use aws_sdk_route53::types::{
    self, Change, ChangeAction, ChangeBatch, ChangeInfo, ResourceRecord, ResourceRecordSet, RrType,
};
use s3site_cloud::{
    AliasTarget, ChangeStatus, CloudError, DnsApi, DnsRecord, HostedZone, Result, ZoneChange,
};

pub struct Route53Dns {
    client: Client,
}

impl Route53Dns {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    async fn change_records(
        &self,
        zone_id: &str,
        action: ChangeAction,
        record: &DnsRecord,
    ) -> Result<()> {
        let change = Change::builder()
            .action(action)
            .resource_record_set(to_record_set(record)?)
            .build()
            .map_err(build_error)?;
        let batch = ChangeBatch::builder()
            .changes(change)
            .build()
            .map_err(build_error)?;

        self.client
            .change_resource_record_sets()
            .hosted_zone_id(zone_id)
            .change_batch(batch)
            .send()
            .await
            .map_err(|e| from_sdk("ChangeResourceRecordSets", e))?;
        Ok(())
    }
}

fn change_status(info: &ChangeInfo) -> ChangeStatus {
    let status: Option<&types::ChangeStatus> = Option::from(info.status());
    match status.map(|s| s.as_str()) {
        Some("INSYNC") => ChangeStatus::InSync,
        _ => ChangeStatus::Pending,
    }
}

fn to_zone(zone: &types::HostedZone) -> HostedZone {
    HostedZone {
        id: owned(zone.id()),
        name: owned(zone.name()),
    }
}

fn to_record(set: &ResourceRecordSet) -> DnsRecord {
    let record_type: Option<&RrType> = Option::from(set.r#type());
    let values: &[ResourceRecord] = slice(set.resource_records());

    DnsRecord {
        name: owned(set.name()),
        record_type: record_type.map(|t| t.as_str().to_string()).unwrap_or_default(),
        ttl: set.ttl(),
        values: values.iter().map(|r| owned(r.value())).collect(),
        alias_target: set.alias_target().map(|target| AliasTarget {
            hosted_zone_id: owned(target.hosted_zone_id()),
            dns_name: owned(target.dns_name()),
            evaluate_target_health: truthy(target.evaluate_target_health()),
        }),
        set_identifier: set.set_identifier().map(str::to_string),
    }
}

fn to_record_set(record: &DnsRecord) -> Result<ResourceRecordSet> {
    let values = record
        .values
        .iter()
        .map(|value| {
            ResourceRecord::builder()
                .value(value)
                .build()
                .map_err(build_error)
        })
        .collect::<Result<Vec<_>>>()?;

    let alias_target = match &record.alias_target {
        Some(target) => Some(
            types::AliasTarget::builder()
                .hosted_zone_id(&target.hosted_zone_id)
                .dns_name(&target.dns_name)
                .evaluate_target_health(target.evaluate_target_health)
                .build()
                .map_err(build_error)?,
        ),
        None => None,
    };

    ResourceRecordSet::builder()
        .name(&record.name)
        .r#type(RrType::from(record.record_type.as_str()))
        .set_ttl(record.ttl)
        .set_resource_records((!values.is_empty()).then_some(values))
        .set_alias_target(alias_target)
        .set_set_identifier(record.set_identifier.clone())
        .build()
        .map_err(build_error)
}

#[async_trait]
impl DnsApi for Route53Dns {
    async fn list_zones(&self) -> Result<Vec<HostedZone>> {
        tracing::debug!("ListHostedZones");
        let mut zones = Vec::new();
        let mut marker: Option<String> = None;

        loop {
            let output = self
                .client
                .list_hosted_zones()
                .set_marker(marker.take())
                .send()
                .await
                .map_err(|e| from_sdk("ListHostedZones", e))?;

            let page: &[types::HostedZone] = slice(output.hosted_zones());
            zones.extend(page.iter().map(to_zone));

            match output.next_marker() {
                Some(next) if truthy(output.is_truncated()) => marker = Some(next.to_string()),
                _ => break,
            }
        }

        Ok(zones)
    }

    async fn create_zone(&self, domain: &str) -> Result<ZoneChange> {
        tracing::debug!("CreateHostedZone {}", domain);
        let caller_reference = format!("s3site {} {}", domain, chrono::Utc::now().to_rfc3339());
        let output = self
            .client
            .create_hosted_zone()
            .name(domain)
            .caller_reference(caller_reference)
            .send()
            .await
            .map_err(|e| from_sdk("CreateHostedZone", e))?;

        let zone: Option<&types::HostedZone> = Option::from(output.hosted_zone());
        let info: Option<&ChangeInfo> = Option::from(output.change_info());
        match (zone, info) {
            (Some(zone), Some(info)) => Ok(ZoneChange {
                zone: to_zone(zone),
                change_id: owned(info.id()),
                status: change_status(info),
            }),
            _ => Err(CloudError::RemoteApi {
                code: "EmptyResponse".to_string(),
                message: format!("CreateHostedZone returned no zone for {}", domain),
            }),
        }
    }

    async fn change_status(&self, change_id: &str) -> Result<ChangeStatus> {
        tracing::debug!("GetChange {}", change_id);
        let output = self
            .client
            .get_change()
            .id(change_id)
            .send()
            .await
            .map_err(|e| from_sdk("GetChange", e))?;

        let info: Option<&ChangeInfo> = Option::from(output.change_info());
        Ok(info.map(change_status).unwrap_or(ChangeStatus::Pending))
    }

    async fn list_records(&self, zone_id: &str) -> Result<Vec<DnsRecord>> {
        tracing::debug!("ListResourceRecordSets {}", zone_id);
        let mut records = Vec::new();
        let mut start: Option<(String, Option<RrType>, Option<String>)> = None;

        loop {
            let mut request = self
                .client
                .list_resource_record_sets()
                .hosted_zone_id(zone_id);
            if let Some((name, record_type, identifier)) = start.take() {
                request = request
                    .start_record_name(name)
                    .set_start_record_type(record_type)
                    .set_start_record_identifier(identifier);
            }

            let output = request
                .send()
                .await
                .map_err(|e| from_sdk("ListResourceRecordSets", e))?;

            let page: &[ResourceRecordSet] = slice(output.resource_record_sets());
            records.extend(page.iter().map(to_record));

            match output.next_record_name() {
                Some(name) if truthy(output.is_truncated()) => {
                    start = Some((
                        name.to_string(),
                        output.next_record_type().cloned(),
                        output.next_record_identifier().map(str::to_string),
                    ));
                }
                _ => break,
            }
        }

        Ok(records)
    }

    async fn create_record(&self, zone_id: &str, record: &DnsRecord) -> Result<()> {
        tracing::debug!("CREATE {} {} in {}", record.record_type, record.name, zone_id);
        self.change_records(zone_id, ChangeAction::Create, record)
            .await
    }

    async fn delete_record(&self, zone_id: &str, record: &DnsRecord) -> Result<()> {
        tracing::debug!("DELETE {} {} in {}", record.record_type, record.name, zone_id);
        self.change_records(zone_id, ChangeAction::Delete, record)
            .await
    }
}
