//! Infrastructure configuration modules.

pub mod logging;
pub mod policy;
pub mod scan;
pub mod settings;
