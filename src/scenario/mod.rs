//! Scripted sequences of filesystem operations, loaded from YAML.
//!
//! ```yaml
//! root: root
//! steps:
//!   - add: { parent: root, name: docs, folder: true }
//!   - add: { parent: docs, name: notes.txt }
//!   - parallel:
//!       - list: docs
//!       - like: { folder: root, pattern: .TXT }
//!   - structure
//! ```

mod outcome;
mod scenario;
mod step;

pub use outcome::Outcome;
pub use scenario::{Scenario, ScenarioError};
pub use step::Step;
