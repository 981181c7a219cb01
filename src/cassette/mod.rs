//! Recording and replaying of port interactions.

pub mod format;
pub mod recorder;
pub mod replayer;

pub use format::{Cassette, Interaction};
pub use recorder::CassetteRecorder;
pub use replayer::{CassetteReplayer, ReplayError};
