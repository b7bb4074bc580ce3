//! Escape-sequence stripping for decoded terminal output.

use std::iter::Peekable;
use std::str::CharIndices;

/// An unterminated sequence longer than this is dropped, not carried.
const MAX_PENDING: usize = 4096;

/// Remove CSI (`ESC [`), OSC (`ESC ]`, ended by BEL or ST) and
/// single-character escape sequences, keeping the printable text.
/// An unterminated sequence at the end is dropped.
pub fn strip_escapes(text: &str) -> String {
    EscapeStripper::default().strip(text)
}

/// Stateful [`strip_escapes`] for chunked output: a sequence cut off at
/// the end of one chunk is completed by the next.
#[derive(Debug, Default)]
pub struct EscapeStripper {
    pending: String,
}

impl EscapeStripper {
    pub fn strip(&mut self, text: &str) -> String {
        let input = if self.pending.is_empty() {
            text.to_string()
        } else {
            let mut joined = std::mem::take(&mut self.pending);
            joined.push_str(text);
            joined
        };

        let mut out = String::with_capacity(input.len());
        let mut chars = input.char_indices().peekable();
        while let Some((start, c)) = chars.next() {
            if c != '\x1b' {
                out.push(c);
                continue;
            }
            if !skip_sequence(&mut chars) {
                if input.len() - start <= MAX_PENDING {
                    self.pending = input[start..].to_string();
                }
                break;
            }
        }
        out
    }

    /// Bytes held back waiting for the rest of a sequence.
    pub fn pending(&self) -> &str {
        &self.pending
    }

    pub fn reset(&mut self) {
        self.pending.clear();
    }
}

/// Consume one sequence after its `ESC`. Returns `false` if the input
/// ended before the sequence did.
fn skip_sequence(chars: &mut Peekable<CharIndices<'_>>) -> bool {
    match chars.next().map(|(_, c)| c) {
        None => false,
        // Parameters and intermediates, then one final byte.
        Some('[') => chars.any(|(_, c)| ('\x40'..='\x7e').contains(&c)),
        Some(']') => {
            while let Some((_, c)) = chars.next() {
                if c == '\x07' {
                    return true;
                }
                if c == '\x1b' {
                    match chars.peek() {
                        Some((_, '\\')) => {
                            chars.next();
                            return true;
                        }
                        None => return false,
                        Some(_) => {}
                    }
                }
            }
            false
        }
        Some('(' | ')' | '*' | '+') => chars.next().is_some(),
        Some(_) => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_color_codes() {
        let colored = "\x1b[32m➜\x1b[39m  \x1b[1mLocal\x1b[22m:   \x1b[36mhttp://localhost:\x1b[1m5173\x1b[22m/\x1b[39m";
        assert_eq!(strip_escapes(colored), "➜  Local:   http://localhost:5173/");
    }

    #[test]
    fn strips_osc_title_with_bel_and_st() {
        assert_eq!(strip_escapes("\x1b]0;title\x07ok"), "ok");
        assert_eq!(strip_escapes("\x1b]8;;http://x\x1b\\link"), "link");
    }

    #[test]
    fn strips_single_char_and_charset_escapes() {
        assert_eq!(strip_escapes("a\x1b=b\x1b(Bc"), "abc");
    }

    #[test]
    fn split_sequence_is_completed_by_next_chunk() {
        let mut stripper = EscapeStripper::default();
        assert_eq!(stripper.strip("http://localhost:\x1b[1"), "http://localhost:");
        assert_eq!(stripper.pending(), "\x1b[1");
        assert_eq!(stripper.strip("m5173\x1b[22m/"), "5173/");
        assert_eq!(stripper.pending(), "");
    }

    #[test]
    fn split_osc_and_lone_escape_are_carried() {
        let mut stripper = EscapeStripper::default();
        assert_eq!(stripper.strip("a\x1b]0;ti"), "a");
        assert_eq!(stripper.strip("tle\x1b"), "");
        assert_eq!(stripper.strip("\\b\x1b"), "b");
        assert_eq!(stripper.strip("=c"), "c");
    }

    #[test]
    fn one_shot_drops_unterminated_tail() {
        assert_eq!(strip_escapes("ok\x1b[3"), "ok");
    }

    #[test]
    fn plain_text_unchanged() {
        assert_eq!(strip_escapes("listening on :3000"), "listening on :3000");
    }
}
