//! Entity structs for taskward domain objects.
//!
//! All structs derive `Serialize`, `Deserialize`, and `JsonSchema` for JSON
//! roundtrip and schema validation.

mod note;
mod task;

pub use note::Note;
pub use task::Task;
