pub mod manager;
pub mod memory;
pub mod models;
pub mod postgres;
pub mod store;

pub use manager::{DatabaseError, DatabaseManager};
pub use memory::MemoryCategoryStore;
pub use models::{Category, CategoryDraft};
pub use postgres::PgCategoryStore;
pub use store::{CategoryContext, CategoryStore};
