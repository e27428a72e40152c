//! Attaching loggers to types and their instances.
//!
//! A logger attached at the type level is labelled with the bare type name.
//! Each instance-level attachment draws the next ordinal for its type from an
//! [`InstanceRegistry`], so the third `HttpServer` built in a process logs as
//! `HTTP-SERVER-02`.
//!
//! ```
//! use serde_json::json;
//! use taglog::{attach_logger, Logger};
//!
//! struct Worker {
//!     logger: Logger,
//! }
//!
//! impl Worker {
//!     fn new() -> Self {
//!         Self { logger: attach_logger!(Worker) }
//!     }
//! }
//!
//! let worker = Worker::new();
//! assert!(worker.logger.label().starts_with("WORKER-"));
//! worker.logger.debug(&[json!("ready")]);
//! ```

use crate::label::short_type_name;
use crate::logger::Logger;
use std::any::{type_name, TypeId};
use std::collections::HashMap;
use std::sync::{Mutex, OnceLock};

/// Where a logger is being attached.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttachPoint {
    /// Shared by the whole type; never numbered.
    Type,
    /// Owned by one value; numbered per type.
    Instance,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttachOptions {
    /// Append the instance ordinal to the label. Ignored for
    /// [`AttachPoint::Type`].
    pub use_instance_number: bool,
}

impl Default for AttachOptions {
    fn default() -> Self {
        Self {
            use_instance_number: true,
        }
    }
}

impl AttachOptions {
    pub fn without_instance_number() -> Self {
        Self {
            use_instance_number: false,
        }
    }
}

/// Next instance ordinal per type.
///
/// Keyed by [`TypeId`], so the table never holds on to the values it numbers.
/// Counters start at zero on first use and only ever move forward.
#[derive(Debug, Default)]
pub struct InstanceRegistry {
    counters: Mutex<HashMap<TypeId, u64>>,
}

impl InstanceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Process-wide registry used by [`attach`].
    pub fn global() -> &'static Self {
        static INSTANCE: OnceLock<InstanceRegistry> = OnceLock::new();
        INSTANCE.get_or_init(InstanceRegistry::new)
    }

    /// Returns the current ordinal for `T` and advances it, as one step.
    pub fn next_ordinal<T: ?Sized + 'static>(&self) -> u64 {
        self.next_ordinal_for(TypeId::of::<T>())
    }

    pub fn next_ordinal_for(&self, key: TypeId) -> u64 {
        let mut counters = self.counters.lock().unwrap_or_else(|e| e.into_inner());
        let next = counters.entry(key).or_insert(0);
        let ordinal = *next;
        *next += 1;
        ordinal
    }

    /// Ordinal the next instance of `T` would receive, without taking it.
    pub fn peek<T: ?Sized + 'static>(&self) -> u64 {
        self.counters
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .get(&TypeId::of::<T>())
            .copied()
            .unwrap_or(0)
    }
}

/// A value with named logger slots.
///
/// Slots should stay out of the value's own data, e.g. behind
/// `#[serde(skip)]`, so installing a logger never changes how the value
/// serializes.
pub trait LoggerHost: 'static {
    /// Stores `logger` in `slot`, replacing whatever was there.
    fn install_logger(&mut self, slot: &str, logger: Logger);
}

/// Builds a logger for `T` using the process-wide registry.
pub fn attach<T: ?Sized + 'static>(point: AttachPoint, options: AttachOptions) -> Logger {
    attach_in::<T>(InstanceRegistry::global(), point, options)
}

/// Builds a logger for `T`, drawing ordinals from `registry`.
///
/// An instance-level attachment consumes an ordinal even when
/// `use_instance_number` is off, so numbering stays stable if the option
/// differs between call sites.
pub fn attach_in<T: ?Sized + 'static>(
    registry: &InstanceRegistry,
    point: AttachPoint,
    options: AttachOptions,
) -> Logger {
    let name = short_type_name(type_name::<T>());
    let ordinal = match point {
        AttachPoint::Type => None,
        AttachPoint::Instance => {
            let ordinal = registry.next_ordinal::<T>();
            tracing::debug!("assigned instance ordinal {} to {}", ordinal, name);
            Some(ordinal)
        }
    };
    Logger::new(name, ordinal.filter(|_| options.use_instance_number))
}

/// Attaches an instance-level logger to `host` under `slot`.
pub fn attach_to<H: LoggerHost>(host: &mut H, slot: &str, options: AttachOptions) {
    attach_to_in(InstanceRegistry::global(), host, slot, options);
}

pub fn attach_to_in<H: LoggerHost>(
    registry: &InstanceRegistry,
    host: &mut H,
    slot: &str,
    options: AttachOptions,
) {
    let logger = attach_in::<H>(registry, AttachPoint::Instance, options);
    host.install_logger(slot, logger);
}

/// Creates a logger for a type from inside its constructor.
///
/// - `attach_logger!(Type)` numbers the logger per instance.
/// - `attach_logger!(Type, static)` creates an unnumbered type-level logger.
/// - `attach_logger!(Type, options)` takes explicit [`AttachOptions`].
#[macro_export]
macro_rules! attach_logger {
    ($ty:ty) => {
        $crate::attach::<$ty>($crate::AttachPoint::Instance, $crate::AttachOptions::default())
    };
    ($ty:ty, static) => {
        $crate::attach::<$ty>($crate::AttachPoint::Type, $crate::AttachOptions::default())
    };
    ($ty:ty, $options:expr) => {
        $crate::attach::<$ty>($crate::AttachPoint::Instance, $options)
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    struct HttpServer;
    struct ConnectionPool;

    #[test]
    fn test_instances_are_numbered_in_order() {
        let registry = InstanceRegistry::new();
        let labels: Vec<String> = (0..3)
            .map(|_| {
                attach_in::<HttpServer>(&registry, AttachPoint::Instance, AttachOptions::default())
                    .label()
                    .to_string()
            })
            .collect();
        assert_eq!(
            labels,
            vec!["HTTP-SERVER-00", "HTTP-SERVER-01", "HTTP-SERVER-02"]
        );
    }

    #[test]
    fn test_types_count_independently() {
        let registry = InstanceRegistry::new();
        registry.next_ordinal::<HttpServer>();
        registry.next_ordinal::<HttpServer>();
        assert_eq!(registry.next_ordinal::<ConnectionPool>(), 0);
        assert_eq!(registry.peek::<HttpServer>(), 2);
    }

    #[test]
    fn test_type_level_never_numbered() {
        let registry = InstanceRegistry::new();
        for options in [AttachOptions::default(), AttachOptions::without_instance_number()] {
            let logger = attach_in::<ConnectionPool>(&registry, AttachPoint::Type, options);
            assert_eq!(logger.label(), "CONNECTION-POOL");
        }
        assert_eq!(registry.peek::<ConnectionPool>(), 0);
    }

    #[test]
    fn test_disabled_numbering_still_advances() {
        let registry = InstanceRegistry::new();
        let plain = attach_in::<HttpServer>(
            &registry,
            AttachPoint::Instance,
            AttachOptions::without_instance_number(),
        );
        assert_eq!(plain.label(), "HTTP-SERVER");

        let numbered =
            attach_in::<HttpServer>(&registry, AttachPoint::Instance, AttachOptions::default());
        assert_eq!(numbered.label(), "HTTP-SERVER-01");
    }

    #[test]
    fn test_concurrent_ordinals_are_unique() {
        let registry = InstanceRegistry::new();
        let mut ordinals: Vec<u64> = std::thread::scope(|s| {
            let handles: Vec<_> = (0..8)
                .map(|_| {
                    s.spawn(|| {
                        (0..50)
                            .map(|_| registry.next_ordinal::<HttpServer>())
                            .collect::<Vec<_>>()
                    })
                })
                .collect();
            handles
                .into_iter()
                .flat_map(|h| h.join().unwrap())
                .collect()
        });
        ordinals.sort_unstable();
        assert_eq!(ordinals, (0..400).collect::<Vec<_>>());
    }
}
