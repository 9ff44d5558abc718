//! Library side of the `stamina` batch driver.

#![allow(missing_docs)]

pub mod jobs;
pub mod logging;
