mod media;
mod time;
mod track;

pub use media::{BackendEvent, ControlHandle, ControlKind, HandleId};
pub use time::{format_time, progress_fraction};
pub use track::Track;
