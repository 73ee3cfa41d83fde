/// Evaluation limits and error policy, filled in from the command line.
#[derive(Debug, Clone, PartialEq)]
pub struct Options {
    /// Nested user function calls allowed before the call fails.
    pub max_call_depth: usize,
    /// Stop the program at the first top-level statement that yields an error.
    pub stop_on_error: bool,
}

pub const DEFAULT_MAX_CALL_DEPTH: usize = 512;

impl Default for Options {
    fn default() -> Self {
        Self {
            max_call_depth: DEFAULT_MAX_CALL_DEPTH,
            stop_on_error: true,
        }
    }
}
