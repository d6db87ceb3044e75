//! UI utilities for the client.

use std::io::Write;

pub(crate) const PROMPT: &str = "> ";

/// Redisplay the prompt after printing received output
pub(crate) fn redisplay_prompt() {
    print!("{}", PROMPT);
    std::io::stdout().flush().ok();
}
