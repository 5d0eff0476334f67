//! Labrig core
//!
//! Input model, naming rules and handler-source templating shared by the
//! labrig CLI. Cloud plumbing lives in `labrig-gcp`; this crate is pure
//! local logic so the derivations stay unit-testable.

pub mod error;
pub mod handler;
pub mod inputs;

// Re-exports
pub use error::{Result, RigError};
pub use handler::{
    HANDLER_ENTRY_POINT, HANDLER_FILE_NAME, HANDLER_RUNTIME, render_handler, write_handler,
};
pub use inputs::{
    LabInputs, PROJECT_ID_ENV, REQUIRED_SERVICES, bucket_name, project_id_from_env,
    pubsub_service_agent, region_from_zone, service_account_member,
};
