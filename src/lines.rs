use std::io::{self, BufRead, ErrorKind, Read};

/// Reads the next `\n`-terminated record into `buf`, terminator included.
/// Returns `false` once the stream is exhausted.
pub fn read_next_record<R: BufRead>(reader: &mut R, buf: &mut Vec<u8>) -> io::Result<bool> {
    buf.clear();
    let bytes_read = reader.read_until(b'\n', buf)?;
    Ok(bytes_read > 0)
}

/// Counts records until end of stream. A final record without a terminator
/// still counts; a stream with zero bytes has zero records.
pub fn count_lines<R: Read>(mut reader: R) -> io::Result<u64> {
    let mut buf = [0u8; 64 * 1024];
    let mut count: u64 = 0;
    let mut last: Option<u8> = None;

    loop {
        let n = match reader.read(&mut buf) {
            Ok(0) => break,
            Ok(n) => n,
            Err(err) if err.kind() == ErrorKind::Interrupted => continue,
            Err(err) => return Err(err),
        };
        count += buf[..n].iter().filter(|&&b| b == b'\n').count() as u64;
        last = Some(buf[n - 1]);
    }

    if matches!(last, Some(b) if b != b'\n') {
        count += 1;
    }
    Ok(count)
}

/// Returns the first record of the stream, terminator included.
pub fn read_header<R: BufRead>(reader: &mut R) -> io::Result<Vec<u8>> {
    let mut header = Vec::new();
    if !read_next_record(reader, &mut header)? {
        return Err(io::Error::new(
            ErrorKind::UnexpectedEof,
            "source is empty, there is no header line to repeat",
        ));
    }
    Ok(header)
}
