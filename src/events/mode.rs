//! # Dispatch mode of a listener registration.
//!
//! The mode is chosen per registration and stored on the registry entry:
//!
//! | Mode    | Runs on                     | `fire_event` waits? | Order                        |
//! |---------|-----------------------------|---------------------|------------------------------|
//! | `Sync`  | the firing task             | yes                 | registration order           |
//! | `Async` | a worker of the async pool  | no                  | submission order only        |

use std::fmt;
use std::str::FromStr;

/// Delivery mode of a registered listener.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum DispatchMode {
    /// Invoked inline by `fire_event`, one after another, before it returns.
    #[default]
    Sync,
    /// Submitted to the bounded worker pool; completion order is unspecified.
    Async,
}

impl DispatchMode {
    /// Returns the lowercase name used in logs and configuration maps.
    pub fn as_str(&self) -> &'static str {
        match self {
            DispatchMode::Sync => "sync",
            DispatchMode::Async => "async",
        }
    }
}

impl fmt::Display for DispatchMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DispatchMode {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sync" | "normal" => Ok(DispatchMode::Sync),
            "async" => Ok(DispatchMode::Async),
            _ => Err(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!("SYNC".parse(), Ok(DispatchMode::Sync));
        assert_eq!(" async ".parse(), Ok(DispatchMode::Async));
        assert_eq!("normal".parse(), Ok(DispatchMode::Sync));
        assert_eq!("later".parse::<DispatchMode>(), Err(()));
    }

    #[test]
    fn test_default_is_sync() {
        assert_eq!(DispatchMode::default(), DispatchMode::Sync);
        assert_eq!(DispatchMode::Async.to_string(), "async");
    }
}
