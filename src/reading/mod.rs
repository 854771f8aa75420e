pub mod buffer;
pub mod pacer;
pub mod state;
pub mod timing;

pub use buffer::DisplayBuffer;
pub use pacer::{Emission, PacerState, Pacer, PauseFlag};
pub use state::ReadingSession;
pub use timing::{split_words, wpm_to_milliseconds};
