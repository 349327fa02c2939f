use super::dto::{ImportFilterDTO, ImportRepositoryRequestDTO};
use crate::provider::snapshot_store::model::UpstreamSnapshot;
use crate::service::common::parse_snapshot_id;
use crate::service::error::{ServiceError, ValidationError};

pub(super) fn validate_import_request(
    request: &ImportRepositoryRequestDTO,
) -> Result<(), ServiceError> {
    if request.name.trim().is_empty() {
        return Err(ValidationError::BlankName.into());
    }

    request
        .filter
        .snapshot_ids
        .iter()
        .try_for_each(|id| parse_snapshot_id(id).map(|_| ()))
}

pub(super) fn filter_snapshots(
    snapshots: Vec<UpstreamSnapshot>,
    filter: &ImportFilterDTO,
) -> Vec<UpstreamSnapshot> {
    snapshots
        .into_iter()
        .filter(|snapshot| {
            filter.snapshot_ids.is_empty()
                || filter
                    .snapshot_ids
                    .iter()
                    .any(|id| id == snapshot.id.as_str() || *id == snapshot.short_id)
        })
        .filter(|snapshot| {
            filter.hostnames.is_empty() || filter.hostnames.contains(&snapshot.hostname)
        })
        .collect()
}
