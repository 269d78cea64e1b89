//! CLI library components for the page statistics toolkit.

pub mod logging;
