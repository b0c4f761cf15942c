//! Log event and call-site location

use std::fmt;
use std::panic::Location;

use chrono::{DateTime, Utc};

use crate::field::Field;
use crate::level::Level;

/// Source location of a log call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Caller {
    pub file: &'static str,
    pub line: u32,
}

impl Caller {
    /// Location of the (track_caller) call site
    #[track_caller]
    #[inline]
    pub fn here() -> Self {
        Self::from_location(Location::caller())
    }

    #[inline]
    pub fn from_location(location: &'static Location<'static>) -> Self {
        Self {
            file: location.file(),
            line: location.line(),
        }
    }

    /// Last `depth` path components of the file (`0` keeps the full path)
    pub fn trimmed_file(&self, depth: usize) -> &'static str {
        if depth == 0 {
            return self.file;
        }

        let mut seen = 0;
        for (i, b) in self.file.bytes().enumerate().rev() {
            if b == b'/' || b == b'\\' {
                seen += 1;
                if seen == depth {
                    return &self.file[i + 1..];
                }
            }
        }
        self.file
    }

    /// `file:line` with the file trimmed to `depth` components
    pub fn render(&self, depth: usize) -> String {
        format!("{}:{}", self.trimmed_file(depth), self.line)
    }
}

impl fmt::Display for Caller {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.file, self.line)
    }
}

/// One log call, borrowed for the duration of a single encode
#[derive(Debug, Clone)]
pub struct LogEvent<'a> {
    pub level: Level,
    pub time: DateTime<Utc>,
    /// Present only when caller capture is enabled
    pub caller: Option<Caller>,
    pub message: &'a str,
    pub stack: Option<&'a str>,
    /// In call order; duplicate keys are kept
    pub fields: &'a [Field],
}

impl<'a> LogEvent<'a> {
    /// Event stamped with the current time
    pub fn new(level: Level, message: &'a str) -> Self {
        Self {
            level,
            time: Utc::now(),
            caller: None,
            message,
            stack: None,
            fields: &[],
        }
    }

    #[must_use]
    pub fn with_time(mut self, time: DateTime<Utc>) -> Self {
        self.time = time;
        self
    }

    #[must_use]
    pub fn with_caller(mut self, caller: Caller) -> Self {
        self.caller = Some(caller);
        self
    }

    #[must_use]
    pub fn with_stack(mut self, stack: &'a str) -> Self {
        self.stack = Some(stack);
        self
    }

    #[must_use]
    pub fn with_fields(mut self, fields: &'a [Field]) -> Self {
        self.fields = fields;
        self
    }
}
