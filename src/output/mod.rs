//! Console output and progress reporting.

pub mod console;
pub mod progress;

pub use console::{print_error, print_info, print_success, print_warning};
pub use progress::{create_segment_bar, create_spinner};
