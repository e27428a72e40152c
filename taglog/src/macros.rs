//! Logging macros taking loose values instead of a `&[Value]` slice.
//!
//! Each argument goes through `serde_json::json!`, so anything serializable
//! can be passed directly:
//!
//! ```
//! use taglog::{tag_info, Logger};
//!
//! let logger = Logger::new("Cache", None);
//! tag_info!(logger, "evicted %d entries from %s", 12, "l2");
//! ```

#[macro_export]
macro_rules! tag_log {
    ($logger:expr $(, $arg:expr)* $(,)?) => {
        $logger.log(&[$($crate::__json!($arg)),*])
    };
}

#[macro_export]
macro_rules! tag_info {
    ($logger:expr $(, $arg:expr)* $(,)?) => {
        $logger.info(&[$($crate::__json!($arg)),*])
    };
}

#[macro_export]
macro_rules! tag_debug {
    ($logger:expr $(, $arg:expr)* $(,)?) => {
        $logger.debug(&[$($crate::__json!($arg)),*])
    };
}

#[macro_export]
macro_rules! tag_warn {
    ($logger:expr $(, $arg:expr)* $(,)?) => {
        $logger.warn(&[$($crate::__json!($arg)),*])
    };
}

#[macro_export]
macro_rules! tag_error {
    ($logger:expr $(, $arg:expr)* $(,)?) => {
        $logger.error(&[$($crate::__json!($arg)),*])
    };
}

#[cfg(test)]
mod tests {
    use crate::console::{ColorLevel, MemorySink, Severity};
    use crate::Logger;
    use serde_json::json;
    use std::sync::Arc;

    #[test]
    fn test_macros_convert_arguments() {
        let sink = Arc::new(MemorySink::new(ColorLevel::None));
        let logger = Logger::with_sink("Cache", None, sink.clone());

        tag_log!(logger, "hit %s", "k1");
        tag_info!(logger);
        tag_debug!(logger, 1, 2,);
        tag_warn!(logger, "size %d", 10_u32);
        tag_error!(logger, vec![1, 2]);

        let records = sink.take();
        assert_eq!(records.len(), 5);
        assert_eq!(records[0].args.last(), Some(&json!("k1")));
        assert_eq!(records[1].args.len(), 6);
        assert_eq!(records[2].args[6..], [json!(1), json!(2)]);
        assert_eq!(records[3].severity, Severity::Warn);
        assert_eq!(records[4].args.last(), Some(&json!([1, 2])));
    }
}
