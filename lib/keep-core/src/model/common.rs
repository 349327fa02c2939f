#[derive(Clone, Debug, Eq, PartialEq)]
pub struct GetListResponse<ResponseItem> {
    pub values: Vec<ResponseItem>,
    pub total_pages: u64,
    pub total_items: u64,
}

impl<ResponseItem> GetListResponse<ResponseItem> {
    pub fn map<T>(self, f: impl FnMut(ResponseItem) -> T) -> GetListResponse<T> {
        GetListResponse {
            values: self.values.into_iter().map(f).collect(),
            total_pages: self.total_pages,
            total_items: self.total_items,
        }
    }
}
