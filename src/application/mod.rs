//! Application layer: session state and the command script
//!
//! This layer validates presentation input and drives the domain tree.

pub mod error;
pub mod error_ext;
pub mod script;
pub mod session;

pub use error::{ApplicationError, ApplicationResult};
pub use error_ext::IoResultExt;
pub use script::{parse_line, parse_script, ScriptCommand};
pub use session::{Outcome, TreeSession};
