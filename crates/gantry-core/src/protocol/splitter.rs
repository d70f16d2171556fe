//! Line tokenization: one validated body → ordered command tokens.
//!
//! A single line may pack several commands (`"G1 X1 M104 S200"`). Each
//! `G`/`M`/`T` letter opens a new token; everything up to the next command
//! letter belongs to the current one. Comments (`;` or `(` to end of line)
//! are stripped once, before splitting, and never become part of a token.

/// The letters that open a new command token.
const COMMAND_LETTERS: [char; 3] = ['G', 'M', 'T'];

/// Strips the comment suffix from `body`.
///
/// The comment starts at the first `;` or `(` and runs to the end of the
/// line.
///
/// # Examples
///
/// ```rust
/// use gantry_core::strip_comment;
///
/// assert_eq!(strip_comment("G1 X10 ; move"), "G1 X10 ");
/// assert_eq!(strip_comment("G1 (inline) X10"), "G1 ");
/// assert_eq!(strip_comment("G1 X10"), "G1 X10");
/// ```
pub fn strip_comment(body: &str) -> &str {
    match body.find([';', '(']) {
        Some(i) => &body[..i],
        None => body,
    }
}

/// Splits a checksum-stripped, comment-stripped body into command tokens.
///
/// Tokens preserve the original sub-order of the line. The first token keeps
/// any text preceding the first command letter; each following token starts
/// at a command letter. A body containing no command letter yields no tokens
/// at all.
///
/// # Examples
///
/// ```rust
/// use gantry_core::split_commands;
///
/// assert_eq!(split_commands("G1 X1 M104 S200"), vec!["G1 X1 ", "M104 S200"]);
/// assert_eq!(split_commands("T0"), vec!["T0"]);
/// assert!(split_commands("   ").is_empty());
/// ```
pub fn split_commands(body: &str) -> Vec<&str> {
    let Some(first) = body.find(COMMAND_LETTERS) else {
        return Vec::new();
    };

    let mut tokens = Vec::new();
    let mut rest = body;
    // Boundaries are searched strictly after the current command letter so
    // the letter itself never terminates its own token.
    let mut scan_from = first + 1;
    loop {
        match rest[scan_from..].find(COMMAND_LETTERS) {
            Some(offset) => {
                let cut = scan_from + offset;
                tokens.push(&rest[..cut]);
                rest = &rest[cut..];
                scan_from = 1;
            }
            None => {
                tokens.push(rest);
                return tokens;
            }
        }
    }
}
