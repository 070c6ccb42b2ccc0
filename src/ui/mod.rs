pub mod icons;
pub mod progress;

pub use progress::{BuildUI, print_report, print_verdict};
