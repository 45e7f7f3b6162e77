//! Format implementations
//!
//! This module contains all format implementations that convert between the macro tree and
//! its text representations.

pub mod lxm;
pub mod python;
pub mod structured;

pub use self::lxm::LxmFormat;
pub use python::PythonFormat;
pub use structured::{JsonFormat, YamlFormat};
