mod splitter;


pub use splitter::{bound, bound_segments, Segment};

use crate::error::ConfigError;

/// Minimum characters before a segment may close
pub const DEFAULT_MIN_CHUNK_SIZE: usize = 500;

/// Ceiling enforced when merging segments
pub const DEFAULT_MAX_CHUNK_SIZE: usize = 1000;

/// Words repeated at the start of the following segment
pub const DEFAULT_OVERLAP_WORDS: usize = 50;

/// Reject sizes the chunker cannot honor.
pub fn validate_sizes(min_size: usize, max_size: usize) -> Result<(), ConfigError> {
    if min_size == 0 {
        return Err(ConfigError::ZeroSize {
            name: "min_chunk_size",
        });
    }
    if max_size == 0 {
        return Err(ConfigError::ZeroSize {
            name: "max_chunk_size",
        });
    }
    if min_size > max_size {
        return Err(ConfigError::MinExceedsMax {
            min: min_size,
            max: max_size,
        });
    }
    Ok(())
}
