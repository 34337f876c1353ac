#![forbid(unsafe_code)]

//! Test harness for WidgetBind.
//!
//! - [`RecordingHost`]: a [`WidgetHost`](wbind_runtime::WidgetHost) that
//!   records every element and widget operation into a shared [`OpLog`].
//! - [`FrameClock`]: deterministic frame clock for driving deferred work.
//! - [`strategies`]: `proptest` strategies for presentation sequences and
//!   identity collections.

pub mod clock;
pub mod recording;
pub mod strategies;

pub use clock::FrameClock;
pub use recording::{CommitMode, Op, OpKind, OpLog, RecordingHost};
