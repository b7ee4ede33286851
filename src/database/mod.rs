pub mod manager;
pub mod models;
pub mod pagination;
pub mod params;
pub mod repository;

pub use manager::{DatabaseError, DatabaseManager};
pub use pagination::{PaginationInfo, PaginationSource};
pub use repository::Repository;
