//! Command handlers grouped by concern.

pub(crate) mod directory;
pub(crate) mod report;
pub(crate) mod view;
pub(crate) mod watch;
