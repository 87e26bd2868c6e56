// handlers/mod.rs
//
// Public: `/` and `/health`.
// Protected (bearer JWT): `/api/category` and `/api/category/:id`.

pub mod category;
pub mod health;
pub mod payload;

pub use health::{health, root};
pub use payload::CategoryPayload;
