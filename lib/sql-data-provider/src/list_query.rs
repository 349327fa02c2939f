use keep_core::model::common::GetListResponse;
use keep_core::model::list_query::ListPagination;
use keep_core::repository::error::DataLayerError;
use sea_orm::{DatabaseConnection, EntityTrait, FromQueryResult, PaginatorTrait, QuerySelect, Select};

use crate::common::calculate_pages_count;
use crate::mapper::to_data_layer_error;

pub(crate) trait SelectWithPagination {
    /// Applies `LIMIT`/`OFFSET` for a zero-based page.
    fn with_pagination(self, pagination: &Option<ListPagination>) -> Self;
}

impl<T: EntityTrait> SelectWithPagination for Select<T> {
    fn with_pagination(self, pagination: &Option<ListPagination>) -> Select<T> {
        match pagination {
            Some(pagination) => {
                let limit = pagination.page_size as u64;
                let offset = (pagination.page as u64) * limit;
                self.offset(offset).limit(limit)
            }
            None => self,
        }
    }
}

/// Runs a filtered and ordered query as one page plus the unpaged item count.
pub(crate) async fn get_page<E, M, R>(
    db: &DatabaseConnection,
    query: Select<E>,
    pagination: &Option<ListPagination>,
) -> Result<GetListResponse<R>, DataLayerError>
where
    E: EntityTrait<Model = M>,
    M: FromQueryResult + Sized + Send + Sync + 'static,
    R: TryFrom<M, Error = DataLayerError>,
{
    let total_items = query
        .clone()
        .count(db)
        .await
        .map_err(to_data_layer_error)?;

    let models = query
        .with_pagination(pagination)
        .all(db)
        .await
        .map_err(to_data_layer_error)?;

    let page_size = pagination
        .as_ref()
        .map(|p| p.page_size as u64)
        .unwrap_or(total_items);

    Ok(GetListResponse {
        values: models
            .into_iter()
            .map(R::try_from)
            .collect::<Result<_, _>>()?,
        total_pages: calculate_pages_count(total_items, page_size),
        total_items,
    })
}
