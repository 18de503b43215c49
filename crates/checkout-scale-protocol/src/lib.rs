pub mod accumulator;
pub mod builder;
pub mod layout;
pub mod parser;
pub mod status;

pub use accumulator::{AccumulatorState, FrameAccumulator};
pub use builder::FrameBuilder;
pub use layout::FrameLayout;
pub use parser::{FrameParser, ParseOutcome};
pub use status::StatusFlags;
