//! Allocation-free text scanning.
//!
//! Probing may run before the rest of the program is fully set up, so the
//! text probers never touch the heap: lines are read through a fixed-size
//! buffer ([`StackLineReader`]) and inspected through borrowed views
//! ([`StringView`]).

pub mod line_reader;
pub mod string_view;

pub use line_reader::{Line, StackLineReader, STACK_LINE_READER_BUFFER_SIZE};
pub use string_view::{StringView, Tokens};
