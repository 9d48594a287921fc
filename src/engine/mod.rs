pub mod classify;
pub mod mask;
pub mod mode;
pub mod normalize;
pub mod options;
pub mod segment;

pub use classify::{CharClass, classify, is_separator};
pub use mask::{MaskBuffer, MaskOutcome, create_mask};
pub use mode::{ModeParseError, PracticeMode};
pub use options::generate_options;
