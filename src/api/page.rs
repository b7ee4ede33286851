use serde::Serialize;
use uuid::Uuid;

use crate::database::models::Identifiable;
use crate::database::pagination::PaginationInfo;
use crate::filter::PageDirection;

/// Relay-style page metadata.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PageInfo {
    pub has_prev_page: bool,
    pub has_next_page: bool,
    pub start_cursor: Option<Uuid>,
    pub end_cursor: Option<Uuid>,
    pub total_count: i64,
}

impl PageInfo {
    /// Compare the page edges with the bounds of the full filtered set. More
    /// rows exist before the page when its first id is not the set's first id,
    /// and after it when its last id is not the set's last id.
    pub fn from_pagination(info: Option<&PaginationInfo>, page_first: Option<Uuid>, page_last: Option<Uuid>) -> Self {
        let Some(info) = info else {
            return Self { start_cursor: page_first, end_cursor: page_last, ..Self::default() };
        };

        Self {
            has_prev_page: page_first.is_some() && page_first != info.first_id,
            has_next_page: page_last.is_some() && page_last != info.last_id,
            start_cursor: page_first,
            end_cursor: page_last,
            total_count: info.total_count,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page_info: PageInfo,
}

impl<T: Identifiable> Page<T> {
    /// Backward pages are fetched newest-first; flip them so items are always
    /// ascending by id.
    pub fn assemble(mut rows: Vec<T>, info: Option<PaginationInfo>, direction: PageDirection) -> Self {
        if direction == PageDirection::Backward {
            rows.reverse();
        }

        let page_info = PageInfo::from_pagination(
            info.as_ref(),
            rows.first().map(Identifiable::id),
            rows.last().map(Identifiable::id),
        );
        Page { items: rows, page_info }
    }
}
