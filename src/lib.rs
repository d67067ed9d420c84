// Library surface for the binary, headless/integration tests and reuse.
pub mod app;
pub mod app_dirs;
pub mod clock;
pub mod config;
pub mod engine;
pub mod error;
pub mod logging;
pub mod metrics;
pub mod reference;
pub mod runtime;
pub mod session;
pub mod ui;

pub use engine::{ChangeReport, CharState, Edit, RenderCell, ScoringEngine, Snapshot};
pub use error::{Result, StypeError};
pub use reference::ReferenceText;
pub use session::{Session, SessionConfig, SessionEvent};
