//! Page joining for multi-page extraction output.

/// Concatenates pages, ending each with a blank line, and trims the
/// result.
#[must_use]
pub fn join_pages<S: AsRef<str>>(pages: &[S]) -> String {
    let mut text = String::new();
    for page in pages {
        text.push_str(page.as_ref());
        text.push_str("\n\n");
    }
    text.trim().to_owned()
}
