/// Width helpers shared by the compositor, the truncation policy and the formatters.
///
/// Widths are counted in `char`s, not bytes and not display columns.
pub(crate) trait StrExt {
    fn width(&self) -> usize;

    /// The longest prefix that is at most `width` chars wide.
    fn prefix(&self, width: usize) -> &str;
}

impl StrExt for str {
    fn width(&self) -> usize {
        self.chars().count()
    }

    fn prefix(&self, width: usize) -> &str {
        match self.char_indices().nth(width) {
            Some((end, _)) => &self[..end],
            None => self,
        }
    }
}
