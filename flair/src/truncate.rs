//! Width-bounded truncation of plain text

use itertools::Itertools as _;

use crate::Rendered;
use crate::str_ext::StrExt as _;

/// Marks the end of a line that was cut short.
pub const ELLIPSIS: char = '…';

/// Cuts every line of `text` that is wider than `max_width` chars down to exactly `max_width`,
/// the last of which becomes [`ELLIPSIS`].
///
/// Lines are split on `'\n'` and handled independently. A `max_width` of 0 disables truncation.
///
/// ```
/// # use flair::truncate::truncate;
/// let cut = truncate("abcdef\nab", 4);
/// assert_eq!(cut.output, "abc…\nab");
/// assert!(cut.truncated);
/// ```
#[must_use]
pub fn truncate(text: &str, max_width: usize) -> Rendered {
    if max_width == 0 {
        return Rendered {
            output: text.to_owned(),
            truncated: false,
        };
    }
    let mut truncated = false;
    let output = text
        .split('\n')
        .map(|line| {
            if line.width() > max_width {
                truncated = true;
                let mut cut = line.prefix(max_width - 1).to_owned();
                cut.push(ELLIPSIS);
                cut
            } else {
                line.to_owned()
            }
        })
        .join("\n");
    Rendered { output, truncated }
}
