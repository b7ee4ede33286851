pub mod list;
pub mod todo;
pub mod user;

pub use list::TodoList;
pub use todo::Todo;
pub use user::User;

use uuid::Uuid;

/// Rows addressable by the primary key that keyset pagination walks.
pub trait Identifiable {
    fn id(&self) -> Uuid;
}
