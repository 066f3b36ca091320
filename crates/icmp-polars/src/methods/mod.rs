//! DataFrame implementations of the extension and conversion traits

mod artefact;
pub(crate) mod columns;
mod episode;
mod event;
mod trend;

pub use artefact::artefact_text_frame;
pub use episode::{attached_from_frame, attached_timestamps_from_frame};
