pub mod backend;
pub mod error;
mod located;
mod path;

pub use crate::backend::ArtifactStore;
pub use crate::located::Located;
pub use crate::path::validate as validate_path;
use std::sync::Arc;

pub type StoreHandle = Arc<dyn ArtifactStore + Send + Sync>;
