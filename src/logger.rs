//! Logger Module
//!
//! The diagnostic collaborator the cache narrates its decisions to.

use std::fmt::{self, Display, Write as _};

/// Key/value pairs attached to a log message.
pub type Fields<'a> = &'a [(&'static str, &'a dyn Display)];

// == Logger Trait ==
/// Receives one line per cache decision.
///
/// Implementations must not panic; the cache ignores anything they do.
pub trait Logger: Send + Sync {
    fn info(&self, msg: &str, fields: Fields<'_>);
}

// == Tracing Logger ==
/// Forwards cache narration to `tracing` at info level.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingLogger;

impl Logger for TracingLogger {
    fn info(&self, msg: &str, fields: Fields<'_>) {
        tracing::info!(
            target: "submission_cache",
            fields = %KeyValues(fields),
            "{}",
            msg
        );
    }
}

/// Renders pairs as `k1=v1 k2=v2`.
struct KeyValues<'a>(Fields<'a>);

impl Display for KeyValues<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (key, value)) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_char(' ')?;
            }
            write!(f, "{}={}", key, value)?;
        }
        Ok(())
    }
}
