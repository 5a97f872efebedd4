/// Crate-wide error type.
pub mod error;
/// Small filesystem and text helpers shared by both tools.
pub mod fs;
/// Console status reporting.
pub mod report;
