use foodgram_domain::pagination::PageRequest;
use sea_orm::{EntityTrait, QuerySelect, Select};

/// Page slicing for sea-orm selects.
///
/// Named `for_page` so it does not shadow `PaginatorTrait::paginate`.
pub trait Paginate {
    /// Apply `OFFSET`/`LIMIT` for one page.
    fn for_page(self, request: PageRequest) -> Self;
}

impl<E> Paginate for Select<E>
where
    E: EntityTrait,
{
    fn for_page(self, request: PageRequest) -> Self {
        let request = request.clamped();
        self.offset(request.offset()).limit(u64::from(request.limit))
    }
}
