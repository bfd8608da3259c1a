// Domain layer: entities, error taxonomy, storage ports and pure helpers.

pub mod entities;
pub mod errors;
pub mod hash_link;
pub mod money;
pub mod pix;
pub mod ports;

pub use errors::{AppError, StoreError};
