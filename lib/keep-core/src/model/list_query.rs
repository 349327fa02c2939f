#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ListPagination {
    pub page: u32,
    pub page_size: u32,
}
