//! Bounded line reader.
//!
//! `BufRead::read_line` would buffer an arbitrarily long line before we
//! could look at it. [`read_frame`] keeps at most `max_line + 1` bytes and
//! drains the rest of an over-long line to its newline.

use std::io::{self, BufRead};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Frame {
    /// One line, newline (and a preceding `\r`) stripped. May be empty.
    Line(String),
    /// A line longer than the limit; carries its full length.
    Oversized(usize),
    InvalidUtf8,
}

/// Read the next frame, or `None` at EOF.
///
/// A final line without a trailing newline is still returned.
pub fn read_frame<R: BufRead + ?Sized>(reader: &mut R, max_line: usize) -> io::Result<Option<Frame>> {
    let mut buf: Vec<u8> = Vec::new();
    let mut total = 0usize;
    let mut saw_bytes = false;

    loop {
        let (used, done) = {
            let available = match reader.fill_buf() {
                Ok(bytes) => bytes,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            };
            if available.is_empty() {
                if !saw_bytes {
                    return Ok(None);
                }
                break;
            }
            saw_bytes = true;

            let newline = available.iter().position(|&b| b == b'\n');
            let chunk = &available[..newline.unwrap_or(available.len())];
            total += chunk.len();

            let room = (max_line + 1).saturating_sub(buf.len());
            buf.extend_from_slice(&chunk[..chunk.len().min(room)]);

            match newline {
                Some(i) => (i + 1, true),
                None => (available.len(), false),
            }
        };
        reader.consume(used);
        if done {
            break;
        }
    }

    // `buf` holds the whole line whenever it is short enough to matter.
    let mut len = total;
    if total == buf.len() && buf.last() == Some(&b'\r') {
        buf.pop();
        len -= 1;
    }
    if len > max_line {
        return Ok(Some(Frame::Oversized(len)));
    }

    Ok(Some(match String::from_utf8(buf) {
        Ok(line) => Frame::Line(line),
        Err(_) => Frame::InvalidUtf8,
    }))
}

// =============================================================================
// TESTS
// =============================================================================
