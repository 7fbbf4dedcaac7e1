//! Log pagination and sanitization.
//!
//! A container's log is split into lines and served in fixed windows of
//! [`LINES_PER_PAGE`] lines, numbered from the newest end: page 1 is the
//! tail of the log and higher pages walk back toward its start.

use thiserror::Error;

/// Number of lines in one page.
pub const LINES_PER_PAGE: usize = 100;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PageError {
    #[error("page numbers start at 1, got {0}")]
    InvalidPage(usize),
}

/// Number of pages needed to hold `line_count` lines.
pub fn total_pages(line_count: usize) -> usize {
    line_count.div_ceil(LINES_PER_PAGE)
}

/// Returns page `page` of `raw`, sanitized, one `\n` after every line.
///
/// `raw` is split on `\n` exactly; a trailing terminator produces a final
/// empty line that counts like any other. A page past the end yields an
/// empty buffer rather than an error.
///
/// Sanitization keeps only printable ASCII (32..=126), `\n` and `\r`. Every
/// other byte is dropped, which includes each byte of a multi-byte UTF-8
/// sequence.
pub fn page(raw: &[u8], page: usize) -> Result<Vec<u8>, PageError> {
    if page == 0 {
        return Err(PageError::InvalidPage(page));
    }

    let lines: Vec<&[u8]> = raw.split(|&b| b == b'\n').collect();
    let total = lines.len();
    if page > total_pages(total) {
        return Ok(Vec::new());
    }

    let end = total - (page - 1) * LINES_PER_PAGE;
    let start = end.saturating_sub(LINES_PER_PAGE);

    let selected = &lines[start..end];
    let mut out = Vec::with_capacity(selected.iter().map(|l| l.len() + 1).sum());
    for line in selected {
        out.extend(line.iter().copied().filter(|&b| is_retained(b)));
        out.push(b'\n');
    }
    Ok(out)
}

fn is_retained(b: u8) -> bool {
    matches!(b, 32..=126 | b'\n' | b'\r')
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    /// `count` lines "line 1" .. "line {count}" joined by `\n`, no trailing
    /// terminator.
    fn numbered(count: usize) -> Vec<u8> {
        (1..=count)
            .map(|n| format!("line {n}"))
            .collect::<Vec<_>>()
            .join("\n")
            .into_bytes()
    }

    fn expected(range: std::ops::RangeInclusive<usize>) -> Vec<u8> {
        range.map(|n| format!("line {n}\n")).collect::<String>().into_bytes()
    }

    #[test]
    fn first_page_is_the_tail() {
        let raw = numbered(250);
        assert_eq!(page(&raw, 1).unwrap(), expected(151..=250));
        assert_eq!(page(&raw, 2).unwrap(), expected(51..=150));
        assert_eq!(page(&raw, 3).unwrap(), expected(1..=50));
    }

    #[test]
    fn past_the_end_is_empty_not_an_error() {
        let raw = numbered(250);
        assert_eq!(page(&raw, 4), Ok(Vec::new()));
        assert_eq!(page(&raw, 1_000_000), Ok(Vec::new()));
    }

    #[test]
    fn page_zero_is_rejected() {
        assert_eq!(page(b"a\nb", 0), Err(PageError::InvalidPage(0)));
    }

    #[test]
    fn short_log_fits_on_one_page() {
        let raw = numbered(3);
        assert_eq!(page(&raw, 1).unwrap(), expected(1..=3));
        assert_eq!(page(&raw, 2).unwrap(), Vec::<u8>::new());
    }

    #[test]
    fn trailing_terminator_keeps_an_empty_line() {
        assert_eq!(page(b"a\nb\n", 1).unwrap(), b"a\nb\n\n".to_vec());
    }

    #[test]
    fn empty_input_is_a_single_empty_line() {
        assert_eq!(page(b"", 1).unwrap(), b"\n".to_vec());
        assert_eq!(page(b"", 2).unwrap(), Vec::<u8>::new());
    }

    #[test]
    fn exact_multiple_of_page_size() {
        let raw = numbered(200);
        assert_eq!(total_pages(200), 2);
        assert_eq!(page(&raw, 1).unwrap(), expected(101..=200));
        assert_eq!(page(&raw, 2).unwrap(), expected(1..=100));
        assert_eq!(page(&raw, 3).unwrap(), Vec::<u8>::new());
    }

    #[test]
    fn strips_control_and_non_ascii_bytes() {
        let raw = "\x01\x00ok\tdone\r\ncafé \x1b[31mred\x7f".as_bytes();
        assert_eq!(page(raw, 1).unwrap(), b"okdone\r\ncaf [31mred\n".to_vec());
    }

    #[test]
    fn output_only_contains_retained_bytes() {
        let raw: Vec<u8> = (0..=255u8).cycle().take(4096).collect();
        let out = page(&raw, 1).unwrap();
        assert!(out.iter().all(|&b| is_retained(b)));
    }

    #[test]
    fn paging_is_pure() {
        let raw = numbered(120);
        assert_eq!(page(&raw, 2), page(&raw, 2));
    }
}
