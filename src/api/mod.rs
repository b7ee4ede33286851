pub mod page;

pub use page::{Page, PageInfo};
