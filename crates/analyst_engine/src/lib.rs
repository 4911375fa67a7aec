//! Analyst engine: backend IO and effect execution.
mod backend;
mod engine;
mod persist;
mod settings;
mod types;
mod wire;

pub use backend::{Backend, ReqwestBackend};
pub use engine::EngineHandle;
pub use persist::{ensure_output_dir, AtomicFileWriter, PersistError};
pub use settings::{BackendSettings, DataSource, Endpoints, SamplingParams, SamplingProfile};
pub use types::{BackendError, EngineEvent, FailureKind};
