//! Chunked UTF-8 forwarding

use std::io::{self, ErrorKind, Read};

/// Read `reader` to the end, handing text to `write` after every read
///
/// A UTF-8 sequence split across two reads is held back until it is
/// complete. Invalid bytes become U+FFFD. Returns the number of bytes read.
pub fn forward_output<R, F>(mut reader: R, chunk: usize, mut write: F) -> io::Result<usize>
where
    R: Read,
    F: FnMut(&str),
{
    let mut buf = vec![0u8; chunk.max(4)];
    let mut pending: Vec<u8> = Vec::new();
    let mut total = 0;

    loop {
        let read = match reader.read(&mut buf) {
            Ok(0) => break,
            Ok(read) => read,
            Err(err) if err.kind() == ErrorKind::Interrupted => continue,
            Err(err) => return Err(err),
        };
        total += read;
        pending.extend_from_slice(&buf[..read]);
        drain_complete(&mut pending, &mut write);
    }

    if !pending.is_empty() {
        write(&String::from_utf8_lossy(&pending));
    }

    Ok(total)
}

/// Emit every complete sequence in `pending`, keeping an incomplete tail
fn drain_complete<F: FnMut(&str)>(pending: &mut Vec<u8>, write: &mut F) {
    let mut text = String::new();

    loop {
        match std::str::from_utf8(pending) {
            Ok(valid) => {
                text.push_str(valid);
                pending.clear();
                break;
            }
            Err(err) => {
                let valid = err.valid_up_to();
                text.push_str(std::str::from_utf8(&pending[..valid]).unwrap_or_default());
                match err.error_len() {
                    Some(invalid) => {
                        text.push(char::REPLACEMENT_CHARACTER);
                        pending.drain(..valid + invalid);
                    }
                    None => {
                        pending.drain(..valid);
                        break;
                    }
                }
            }
        }
    }

    if !text.is_empty() {
        write(&text);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    /// Reader returning at most `step` bytes per call
    struct Trickle<'a> {
        data: &'a [u8],
        step: usize,
    }

    impl Read for Trickle<'_> {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            let n = self.step.min(buf.len()).min(self.data.len());
            buf[..n].copy_from_slice(&self.data[..n]);
            self.data = &self.data[n..];
            Ok(n)
        }
    }

    fn collect<R: Read>(reader: R, chunk: usize) -> Vec<String> {
        let mut chunks = Vec::new();
        forward_output(reader, chunk, |text| chunks.push(text.to_string())).unwrap();
        chunks
    }

    #[test]
    fn test_empty_input_writes_nothing() {
        assert!(collect(Cursor::new(Vec::new()), 16).is_empty());
    }

    #[test]
    fn test_chunks_in_order() {
        let chunks = collect(Cursor::new(b"hello world\n".to_vec()), 4);
        assert_eq!(chunks, ["hell", "o wo", "rld\n"]);
    }

    #[test]
    fn test_split_multibyte_is_carried() {
        // "é" is two bytes; one byte per read splits it.
        let data = "aé!".as_bytes();
        let chunks = collect(Trickle { data, step: 1 }, 16);
        assert_eq!(chunks.concat(), "aé!");
        assert!(chunks.iter().all(|chunk| !chunk.contains('\u{FFFD}')));
    }

    #[test]
    fn test_invalid_bytes_replaced() {
        let chunks = collect(Cursor::new(vec![b'a', 0xFF, b'b']), 16);
        assert_eq!(chunks.concat(), "a\u{FFFD}b");
    }

    #[test]
    fn test_truncated_tail_flushed_lossy() {
        let chunks = collect(Cursor::new(vec![b'x', 0xC3]), 16);
        assert_eq!(chunks.concat(), "x\u{FFFD}");
    }

    #[test]
    fn test_returns_byte_count() {
        let total = forward_output(Cursor::new(b"12345".to_vec()), 2, |_| {}).unwrap();
        assert_eq!(total, 5);
    }

    /// Yields some bytes, then fails like a broken pipe
    struct Broken {
        sent: bool,
    }

    impl Read for Broken {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            if self.sent {
                return Err(io::Error::new(ErrorKind::BrokenPipe, "pipe closed"));
            }
            self.sent = true;
            buf[0] = b'a';
            Ok(1)
        }
    }

    #[test]
    fn test_read_error_is_returned_after_partial_output() {
        let mut chunks = Vec::new();
        let err = forward_output(Broken { sent: false }, 16, |text| {
            chunks.push(text.to_string())
        })
        .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::BrokenPipe);
        assert_eq!(chunks, ["a"]);
    }
}
