//! Literal escaping for values embedded in single-quoted query text.
//!
//! [`esc`] is shared by the SQL compilers and by any caller that needs to
//! splice a user value into an AGQL or SQL string literal.

/// Escape unescaped single quotes with a backslash.
///
/// A quote counts as already escaped when it is preceded by an odd number of
/// consecutive backslashes. Quotes preceded by an even number (including
/// none) get a backslash inserted. The result is stable under repeated
/// application: `esc(&esc(s)) == esc(s)`.
///
/// # Example
///
/// ```
/// use agql::ql::esc;
///
/// assert_eq!(esc("O'Reilly"), "O\\'Reilly");
/// assert_eq!(esc("O\\'Reilly"), "O\\'Reilly");
/// ```
pub fn esc(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 4);
    let mut backslashes = 0usize;

    for c in s.chars() {
        match c {
            '\\' => backslashes += 1,
            '\'' => {
                if backslashes % 2 == 0 {
                    out.push('\\');
                }
                backslashes = 0;
            }
            _ => backslashes = 0,
        }
        out.push(c);
    }

    out
}

/// Escape `s` and wrap it in single quotes.
///
/// The result is only a well-formed literal when [`is_quotable`] holds for
/// `s`: a trailing odd run of backslashes escapes the closing quote.
pub fn quote(s: &str) -> String {
    format!("'{}'", esc(s))
}

/// Whether `s` can be passed to [`quote`], i.e. does not end in an odd
/// number of backslashes.
pub fn is_quotable(s: &str) -> bool {
    s.chars().rev().take_while(|&c| c == '\\').count() % 2 == 0
}
