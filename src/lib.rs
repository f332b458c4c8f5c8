//! Incremental, idempotent ingestion of one XRPL issued token's payments
//! into PostgreSQL.
pub mod di;
pub mod entity;
pub mod interactor;
pub mod settings;
pub mod xrpl;

// Re-export commonly used items
pub use di::*;
pub use entity::*;
pub use interactor::*;
pub use settings::Settings;
pub use xrpl::*;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
