pub mod files;
pub mod saver;
pub mod store;

pub use files::{atomic_write, ensure_dir, export_dir};
pub use saver::{SaveOutcome, SaveRequest, Saver};
pub use store::{Schema, Settings, Store};
