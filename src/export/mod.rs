//! Saving attachments to disk and handing them to the system viewer.

pub mod attachment;
