//! Line classification and token scanning over raw input bytes
//!
//! Everything here works on subslices of the mapped input; nothing is
//! copied. Only space and tab count as token separators, and `#` starts a
//! comment running to the end of the line.

/// Kind of a logical OBJ line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    Position,
    Texture,
    Normal,
    Face,
    Ignored,
}

#[inline]
fn is_space(b: u8) -> bool {
    b == b' ' || b == b'\t'
}

/// Truncate a line at its first `#`
#[inline]
pub fn strip_comment(line: &[u8]) -> &[u8] {
    match line.iter().position(|&b| b == b'#') {
        Some(i) => &line[..i],
        None => line,
    }
}

/// Trim leading and trailing spaces and tabs
pub fn trim(mut line: &[u8]) -> &[u8] {
    while let [first, rest @ ..] = line {
        if !is_space(*first) {
            break;
        }
        line = rest;
    }
    while let [rest @ .., last] = line {
        if !is_space(*last) {
            break;
        }
        line = rest;
    }
    line
}

/// Classify a raw line and return its payload (the text after the
/// directive, comment stripped, whitespace trimmed)
pub fn split_directive(line: &[u8]) -> (LineKind, &[u8]) {
    let line = trim(strip_comment(line));
    let run_len = line
        .iter()
        .position(|&b| is_space(b))
        .unwrap_or(line.len());

    let kind = match &line[..run_len] {
        b"v" => LineKind::Position,
        b"vt" => LineKind::Texture,
        b"vn" => LineKind::Normal,
        b"f" => LineKind::Face,
        _ => LineKind::Ignored,
    };

    (kind, trim(&line[run_len..]))
}

/// Classify a raw line by its leading directive run
#[inline]
pub fn classify(line: &[u8]) -> LineKind {
    split_directive(line).0
}

/// Iterate over the lines of a span, without their terminators
///
/// Lines end at LF; a CR directly before the LF is dropped. The final line
/// may be unterminated.
pub fn lines(span: &[u8]) -> Lines<'_> {
    Lines { rest: span }
}

/// Iterator returned by [`lines`]
pub struct Lines<'a> {
    rest: &'a [u8],
}

impl<'a> Iterator for Lines<'a> {
    type Item = &'a [u8];

    fn next(&mut self) -> Option<Self::Item> {
        if self.rest.is_empty() {
            return None;
        }
        let line = match self.rest.iter().position(|&b| b == b'\n') {
            Some(i) => {
                let line = &self.rest[..i];
                self.rest = &self.rest[i + 1..];
                line
            }
            None => {
                let line = self.rest;
                self.rest = &[];
                line
            }
        };
        match line.split_last() {
            Some((b'\r', head)) => Some(head),
            _ => Some(line),
        }
    }
}

/// Iterate over the whitespace-delimited tokens of a line
pub fn tokens(line: &[u8]) -> Tokens<'_> {
    Tokens { rest: line }
}

/// Iterator returned by [`tokens`]
pub struct Tokens<'a> {
    rest: &'a [u8],
}

impl<'a> Iterator for Tokens<'a> {
    type Item = &'a [u8];

    fn next(&mut self) -> Option<Self::Item> {
        let start = self.rest.iter().position(|&b| !is_space(b))?;
        let rest = &self.rest[start..];
        let end = rest.iter().position(|&b| is_space(b)).unwrap_or(rest.len());
        self.rest = &rest[end..];
        Some(&rest[..end])
    }
}
