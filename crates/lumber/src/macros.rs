//! Logging macros
//!
//! Two forms per level. A format string with arguments formats the message
//! (only when the level is enabled):
//!
//! ```ignore
//! lumber::info!(logger, "listening on {}:{}", host, port);
//! ```
//!
//! A message followed by `;` and `key = value` pairs attaches fields:
//!
//! ```ignore
//! lumber::info!(logger, "request served"; status = 200u16, path = "/health");
//! ```

/// Log at an explicit level
#[macro_export]
macro_rules! log {
    ($logger:expr, $level:expr, $msg:expr; $($key:ident = $value:expr),+ $(,)?) => {
        $logger.log(
            $level,
            $msg,
            &[$($crate::Field::new(stringify!($key), $value)),+],
        )
    };
    ($logger:expr, $level:expr, $($arg:tt)+) => {
        $logger.log_fmt($level, format_args!($($arg)+))
    };
}

#[macro_export]
macro_rules! debug {
    ($logger:expr, $($rest:tt)+) => {
        $crate::log!($logger, $crate::Level::Debug, $($rest)+)
    };
}

#[macro_export]
macro_rules! info {
    ($logger:expr, $($rest:tt)+) => {
        $crate::log!($logger, $crate::Level::Info, $($rest)+)
    };
}

#[macro_export]
macro_rules! warn {
    ($logger:expr, $($rest:tt)+) => {
        $crate::log!($logger, $crate::Level::Warn, $($rest)+)
    };
}

#[macro_export]
macro_rules! error {
    ($logger:expr, $($rest:tt)+) => {
        $crate::log!($logger, $crate::Level::Error, $($rest)+)
    };
}

/// Log at panic level; does not panic
///
/// Shadows the std macro wherever it is imported; prefer the
/// `lumber::panic!` path.
#[macro_export]
macro_rules! panic {
    ($logger:expr, $($rest:tt)+) => {
        $crate::log!($logger, $crate::Level::Panic, $($rest)+)
    };
}

/// Log at fatal level; does not exit
#[macro_export]
macro_rules! fatal {
    ($logger:expr, $($rest:tt)+) => {
        $crate::log!($logger, $crate::Level::Fatal, $($rest)+)
    };
}

/// Write to the request sink
#[macro_export]
macro_rules! request {
    ($logger:expr, $msg:expr; $($key:ident = $value:expr),+ $(,)?) => {
        $logger.request_info(
            $msg,
            &[$($crate::Field::new(stringify!($key), $value)),+],
        )
    };
    ($logger:expr, $($arg:tt)+) => {
        $logger.request_info_fmt(format_args!($($arg)+))
    };
}
