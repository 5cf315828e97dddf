//! # Module configuration contract.
//!
//! The surrounding module system hands configuration around as flat string
//! maps tagged with a module name. [`ModuleConfigurable`] is the shape a
//! configuration object exposes to that system; [`EventConfig`](crate::EventConfig)
//! implements it and reads the same map back with
//! [`EventConfig::from_map`](crate::EventConfig::from_map).

use std::collections::HashMap;

/// Configuration object that can be exported as a named string map.
pub trait ModuleConfigurable {
    /// Name of the module the configuration belongs to.
    fn module_name(&self) -> &str;

    /// Flat key/value rendering of the configuration.
    fn to_map(&self) -> HashMap<String, String>;
}
