//! Result type aliases for Marquee.

use crate::MarqueeError;

/// A specialized `Result` type for Marquee operations.
pub type MarqueeResult<T> = Result<T, MarqueeError>;
