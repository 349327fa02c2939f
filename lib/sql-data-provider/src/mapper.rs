use keep_core::repository::error::DataLayerError;
use sea_orm::{DbErr, SqlErr};

pub(crate) fn to_data_layer_error(e: DbErr) -> DataLayerError {
    match e.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => DataLayerError::AlreadyExists,
        Some(SqlErr::ForeignKeyConstraintViolation(_)) => DataLayerError::IncorrectParameters,
        Some(_) | None => DataLayerError::Db(e.into()),
    }
}

pub(crate) fn to_update_data_layer_error(err: DbErr) -> DataLayerError {
    match err {
        DbErr::RecordNotUpdated | DbErr::RecordNotFound(_) => DataLayerError::RecordNotUpdated,
        e => to_data_layer_error(e),
    }
}

/// Counters are unsigned in the domain and stored as signed 64-bit integers.
pub(crate) fn counter_to_db(value: u64) -> Result<i64, DataLayerError> {
    i64::try_from(value).map_err(|_| DataLayerError::MappingError)
}

pub(crate) fn counter_from_db(value: i64) -> Result<u64, DataLayerError> {
    u64::try_from(value).map_err(|_| DataLayerError::MappingError)
}
