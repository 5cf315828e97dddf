//! # Event provider configuration.
//!
//! Provides [`EventConfig`], the settings consumed by
//! [`EventProvider::init`](crate::EventProvider::init).
//!
//! Config is used in two ways:
//! 1. **Direct construction**: `EventConfig { async_pool_size: 8, ..Default::default() }`
//! 2. **Module configuration**: `EventConfig::from_map(&map)` for values supplied as
//!    strings by the surrounding module system (see [`ModuleConfigurable`]).
//!
//! ## Sentinel values
//! - `async_pool_size = 0` → clamped to 1 worker
//! - `queue_capacity = 0` → clamped to 1 slot
//! - `destroy_grace = 0s` → destroy does not wait for in-flight async listeners

use std::collections::HashMap;
use std::time::Duration;

use crate::error::ConfigError;
use crate::events::DispatchMode;
use crate::module::ModuleConfigurable;

/// What happens when an ASYNC listener is submitted to a full dispatch queue.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum SaturationPolicy {
    /// `fire_event` waits for a free queue slot (backpressure).
    #[default]
    Block,
    /// `fire_event` fails with [`EventError::DispatchQueueFull`](crate::EventError::DispatchQueueFull).
    Reject,
}

impl SaturationPolicy {
    /// Returns the lowercase name used in configuration maps.
    pub fn as_str(&self) -> &'static str {
        match self {
            SaturationPolicy::Block => "block",
            SaturationPolicy::Reject => "reject",
        }
    }
}

/// Configuration of an event provider.
///
/// ## Field semantics
/// - `default_mode`: Mode used by `register_listener` when none is given
/// - `async_pool_size`: Number of workers driving ASYNC listeners (min 1)
/// - `queue_capacity`: Bounded queue between `fire_event` and workers (min 1)
/// - `saturation`: Behavior when the queue is full
/// - `destroy_grace`: Maximum wait for in-flight ASYNC listeners on destroy
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EventConfig {
    /// Dispatch mode applied by `register_listener`.
    pub default_mode: DispatchMode,

    /// Number of worker tasks for ASYNC dispatch.
    pub async_pool_size: usize,

    /// Capacity of the ASYNC dispatch queue.
    ///
    /// Queued jobs that have not started when the provider is destroyed are
    /// discarded.
    pub queue_capacity: usize,

    /// Policy for a saturated dispatch queue.
    pub saturation: SaturationPolicy,

    /// Grace period for in-flight ASYNC listeners during destroy.
    ///
    /// Listeners still running afterwards are abandoned (logged, not awaited).
    /// The map form (`destroy_grace_millis`) has millisecond resolution;
    /// [`ModuleConfigurable::to_map`] truncates anything finer.
    pub destroy_grace: Duration,
}

/// Keys understood by [`EventConfig::from_map`].
pub(crate) mod keys {
    pub const DEFAULT_MODE: &str = "default_dispatch_mode";
    pub const POOL_SIZE: &str = "async_pool_size";
    pub const QUEUE_CAPACITY: &str = "queue_capacity";
    pub const SATURATION: &str = "saturation_policy";
    pub const GRACE_MILLIS: &str = "destroy_grace_millis";
}

impl EventConfig {
    /// Module name reported through [`ModuleConfigurable`].
    pub const MODULE_NAME: &'static str = "event";

    /// Returns the worker count clamped to a minimum of 1.
    #[inline]
    pub fn pool_size_clamped(&self) -> usize {
        self.async_pool_size.max(1)
    }

    /// Returns the queue capacity clamped to a minimum of 1.
    #[inline]
    pub fn queue_capacity_clamped(&self) -> usize {
        self.queue_capacity.max(1)
    }

    /// Reads a configuration from string key/value pairs.
    ///
    /// Missing keys keep their [`Default`] value; unknown keys are ignored.
    ///
    /// # Example
    /// ```
    /// use std::collections::HashMap;
    /// use eventvisor::{DispatchMode, EventConfig};
    ///
    /// let mut map = HashMap::new();
    /// map.insert("default_dispatch_mode".to_string(), "async".to_string());
    /// map.insert("async_pool_size".to_string(), "4".to_string());
    ///
    /// let cfg = EventConfig::from_map(&map).unwrap();
    /// assert_eq!(cfg.default_mode, DispatchMode::Async);
    /// assert_eq!(cfg.async_pool_size, 4);
    /// ```
    pub fn from_map(map: &HashMap<String, String>) -> Result<Self, ConfigError> {
        let mut cfg = Self::default();

        if let Some(raw) = map.get(keys::DEFAULT_MODE) {
            cfg.default_mode = raw
                .parse()
                .map_err(|()| invalid(keys::DEFAULT_MODE, raw, "sync | async"))?;
        }
        if let Some(raw) = map.get(keys::POOL_SIZE) {
            cfg.async_pool_size = parse_positive(keys::POOL_SIZE, raw)?;
        }
        if let Some(raw) = map.get(keys::QUEUE_CAPACITY) {
            cfg.queue_capacity = parse_positive(keys::QUEUE_CAPACITY, raw)?;
        }
        if let Some(raw) = map.get(keys::SATURATION) {
            cfg.saturation = match raw.trim().to_ascii_lowercase().as_str() {
                "block" => SaturationPolicy::Block,
                "reject" => SaturationPolicy::Reject,
                _ => return Err(invalid(keys::SATURATION, raw, "block | reject")),
            };
        }
        if let Some(raw) = map.get(keys::GRACE_MILLIS) {
            let ms: u64 = raw
                .trim()
                .parse()
                .map_err(|_| invalid(keys::GRACE_MILLIS, raw, "integer >= 0"))?;
            cfg.destroy_grace = Duration::from_millis(ms);
        }
        Ok(cfg)
    }
}

fn parse_positive(key: &'static str, raw: &str) -> Result<usize, ConfigError> {
    match raw.trim().parse::<usize>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(invalid(key, raw, "integer > 0")),
    }
}

fn invalid(key: &'static str, raw: &str, expected: &'static str) -> ConfigError {
    ConfigError::InvalidValue {
        key,
        value: raw.to_string(),
        expected,
    }
}

impl Default for EventConfig {
    /// Default configuration:
    ///
    /// - `default_mode = Sync`
    /// - `async_pool_size = 4`
    /// - `queue_capacity = 1024`
    /// - `saturation = Block`
    /// - `destroy_grace = 5s`
    fn default() -> Self {
        Self {
            default_mode: DispatchMode::Sync,
            async_pool_size: 4,
            queue_capacity: 1024,
            saturation: SaturationPolicy::Block,
            destroy_grace: Duration::from_secs(5),
        }
    }
}

impl ModuleConfigurable for EventConfig {
    fn module_name(&self) -> &str {
        Self::MODULE_NAME
    }

    fn to_map(&self) -> HashMap<String, String> {
        HashMap::from([
            (
                keys::DEFAULT_MODE.to_string(),
                self.default_mode.as_str().to_string(),
            ),
            (keys::POOL_SIZE.to_string(), self.async_pool_size.to_string()),
            (
                keys::QUEUE_CAPACITY.to_string(),
                self.queue_capacity.to_string(),
            ),
            (
                keys::SATURATION.to_string(),
                self.saturation.as_str().to_string(),
            ),
            (
                keys::GRACE_MILLIS.to_string(),
                self.destroy_grace.as_millis().to_string(),
            ),
        ])
    }
}
