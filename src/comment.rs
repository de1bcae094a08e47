use crate::line::{is_space, Line};

/// Comment state carried from one line to the next within a single stream.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum CommentState {
    #[default]
    Normal,

    /// Inside a `/* ...` that hasn't been closed yet.
    InBlockComment,
}

/// Removes `//` and `/* ... */` comments from an already normalized line.
///
/// `state` is the state the previous line of the same stream left behind; the
/// returned state must be passed along with the next line. A `/* ... */` that opens
/// and closes on one line keeps whatever follows it. Whitespace left dangling at the
/// seams is collapsed again, so stripped lines compare equal regardless of how the
/// comments were spaced.
pub fn strip_comments(line: &mut Line, mut state: CommentState) -> CommentState {
    // Too short to hold a marker.
    if line.len() < 2 {
        if state == CommentState::InBlockComment {
            line.clear_content();
        }
        return state;
    }

    let data = line.content_mut();
    let len = data.len();
    let mut read = 0;
    let mut write = 0;

    while read < len {
        let c = data[read];
        let next = data.get(read + 1).copied();

        match state {
            CommentState::Normal => match (c, next) {
                (b'/', Some(b'/')) => break,
                (b'/', Some(b'*')) => {
                    state = CommentState::InBlockComment;
                    read += 2;
                }
                _ => {
                    if !(is_space(c) && (write == 0 || is_space(data[write - 1]))) {
                        data[write] = c;
                        write += 1;
                    }
                    read += 1;
                }
            },
            CommentState::InBlockComment => {
                if (c, next) == (b'*', Some(b'/')) {
                    state = CommentState::Normal;
                    read += 2;
                } else {
                    read += 1;
                }
            }
        }
    }

    data.truncate(write);
    line.finish();
    state
}

/// Overwrites comments in unnormalized bytes with spaces. Nothing moves, so offsets
/// into `bytes` still match the stream they came from.
pub(crate) fn blank_comments(bytes: &mut [u8], mut state: CommentState) -> CommentState {
    let mut i = 0;

    while i < bytes.len() {
        let next = bytes.get(i + 1).copied();

        match state {
            CommentState::Normal => match (bytes[i], next) {
                (b'/', Some(b'/')) => {
                    bytes[i..].fill(b' ');
                    break;
                }
                (b'/', Some(b'*')) => {
                    state = CommentState::InBlockComment;
                    bytes[i..i + 2].fill(b' ');
                    i += 2;
                }
                _ => i += 1,
            },
            CommentState::InBlockComment => {
                if (bytes[i], next) == (b'*', Some(b'/')) {
                    state = CommentState::Normal;
                    bytes[i..i + 2].fill(b' ');
                    i += 2;
                } else {
                    bytes[i] = b' ';
                    i += 1;
                }
            }
        }
    }

    state
}

#[cfg(test)]
mod tests {
    use super::{blank_comments, strip_comments, CommentState};
    use crate::line::Line;

    fn line(s: &str) -> Line {
        let mut line = Line::new();
        for c in s.bytes() {
            line.push_normalized(c);
        }
        line.finish();
        line
    }

    fn strip_all(lines: &[&str]) -> Vec<String> {
        let mut state = CommentState::Normal;
        lines
            .iter()
            .map(|s| {
                let mut l = line(s);
                state = strip_comments(&mut l, state);
                l.to_string_lossy().into_owned()
            })
            .collect()
    }

    #[test]
    fn line_comment() {
        assert_eq!(strip_all(&["a // b"]), vec!["a"]);
        assert_eq!(strip_all(&["// a /* b"]), vec![""]);
        assert_eq!(strip_all(&["// a /* b", "c"]), vec!["", "c"]);
    }

    #[test]
    fn block_comment_across_lines() {
        assert_eq!(strip_all(&["a /* b", "c */ d"]), vec!["a", "d"]);
        assert_eq!(strip_all(&["/*", "foo", "bar", "*/"]), vec!["", "", "", ""]);
        assert_eq!(strip_all(&["/*", "x", "*/", "y"]), vec!["", "", "", "y"]);
    }

    #[test]
    fn block_comment_on_one_line() {
        assert_eq!(strip_all(&["a /* b */ c"]), vec!["a c"]);
        assert_eq!(strip_all(&["a/* b */c"]), vec!["ac"]);
        assert_eq!(strip_all(&["/* a */ /* b */ c"]), vec!["c"]);
    }

    #[test]
    fn line_marker_inside_block_comment() {
        assert_eq!(strip_all(&["/* a // b", "c */ d"]), vec!["", "d"]);
    }

    #[test]
    fn state_is_returned() {
        let mut l = line("x /* y");
        assert_eq!(
            strip_comments(&mut l, CommentState::Normal),
            CommentState::InBlockComment
        );
        let mut l = line("y */ z");
        assert_eq!(
            strip_comments(&mut l, CommentState::InBlockComment),
            CommentState::Normal
        );
        assert_eq!(l.as_bytes(), b"z");
    }

    #[test]
    fn blanking_keeps_offsets() {
        let mut bytes = b"a /* b */ c = 1; // d\n".to_vec();
        let state = blank_comments(&mut bytes, CommentState::Normal);
        assert_eq!(state, CommentState::Normal);
        assert_eq!(&bytes[..], b"a         c = 1;      ");

        let mut bytes = b"x */ y /* z".to_vec();
        let state = blank_comments(&mut bytes, CommentState::InBlockComment);
        assert_eq!(state, CommentState::InBlockComment);
        assert_eq!(&bytes[..], b"     y     ");
    }

    #[test]
    fn short_lines() {
        assert_eq!(strip_all(&["x"]), vec!["x"]);
        assert_eq!(strip_all(&["/*", "x", "*/ y"]), vec!["", "", "y"]);
    }
}
