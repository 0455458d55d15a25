pub mod config;
pub mod notes;
pub mod run;
pub mod tasks;

/// Turn literal `\n` sequences typed on a command line into newlines.
pub(crate) fn unescape_newlines(text: &str) -> String {
    text.replace("\\n", "\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unescape_turns_backslash_n_into_newline() {
        assert_eq!(unescape_newlines("A 1\\nB 2"), "A 1\nB 2");
        assert_eq!(unescape_newlines("plain"), "plain");
    }
}
