//! CLI command implementations.

mod scan;

pub use scan::ScanCmd;
