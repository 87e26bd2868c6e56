pub mod category;

pub use category::{Category, CategoryDraft, CategoryRow};
