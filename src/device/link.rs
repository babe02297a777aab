use crate::device::READ_TIMEOUT;
use crate::message::TouchEvent;
use std::io::{self, BufRead, BufReader, Read, Write};
use std::thread;
use std::time::Duration;

/// Anything the controller's lines can be read from.
pub trait LineSource {
    /// One line of text, without the line ending. `Ok(None)` when nothing (or nothing
    /// readable) arrived before the read timed out; `Err` when the link is gone.
    fn read_line(&mut self) -> io::Result<Option<String>>;

    fn next_event(&mut self) -> io::Result<TouchEvent> {
        Ok(match self.read_line()? {
            Some(line) => TouchEvent::parse(&line),
            None => TouchEvent::NoEvent,
        })
    }
}

/// Line reader over a serial port (or any `Read` with a read timeout).
pub struct SerialLink<R> {
    reader: BufReader<R>,
}

impl<R: Read> SerialLink<R> {
    pub fn new(port: R) -> Self {
        Self {
            reader: BufReader::new(port),
        }
    }
}

impl<R: Read> LineSource for SerialLink<R> {
    fn read_line(&mut self) -> io::Result<Option<String>> {
        let mut buf = vec![];
        match self.reader.read_until(b'\n', &mut buf) {
            Ok(0) => {
                return Err(io::Error::new(
                    io::ErrorKind::UnexpectedEof,
                    "serial link closed",
                ))
            }
            Ok(_) => {}
            // whatever arrived before the timeout is evaluated on its own
            Err(e) if e.kind() == io::ErrorKind::TimedOut => {}
            Err(e) => return Err(e),
        }
        if buf.is_empty() || !buf.is_ascii() {
            return Ok(None);
        }
        let line = String::from_utf8_lossy(&buf);
        Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
    }
}

/// Reads events typed on the terminal instead of a device.
///
/// Once the input ends it keeps reporting nothing, paced like a serial read, so the
/// idle clip keeps playing.
pub struct Interactive<R, W> {
    input: R,
    prompt: W,
    closed: bool,
    pause: Duration,
}

impl Interactive<io::StdinLock<'static>, io::Stdout> {
    pub fn stdin() -> Self {
        Self::new(io::stdin().lock(), io::stdout())
    }
}

impl<R: BufRead, W: Write> Interactive<R, W> {
    pub fn new(input: R, prompt: W) -> Self {
        Self {
            input,
            prompt,
            closed: false,
            pause: READ_TIMEOUT,
        }
    }
}

impl<R: BufRead, W: Write> LineSource for Interactive<R, W> {
    fn read_line(&mut self) -> io::Result<Option<String>> {
        if self.closed {
            thread::sleep(self.pause);
            return Ok(None);
        }
        write!(self.prompt, "message: ")?;
        self.prompt.flush()?;

        let mut line = String::new();
        match self.input.read_line(&mut line) {
            Ok(0) => {
                tracing::info!("end of interactive input");
                self.closed = true;
                Ok(None)
            }
            Ok(_) => Ok(Some(line.trim_end_matches(['\r', '\n']).to_string())),
            Err(e) if e.kind() == io::ErrorKind::InvalidData => Ok(None),
            Err(e) => Err(e),
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::collections::VecDeque;
    use std::io::Cursor;
    use std::time::Instant;

    /// Hands out prepared lines, then nothing (or a dead link when `unplugged`).
    pub(crate) struct Script {
        lines: VecDeque<Option<String>>,
        unplugged: bool,
    }

    impl Script {
        pub(crate) fn new(lines: &[Option<&str>]) -> Self {
            Self {
                lines: lines.iter().map(|l| l.map(str::to_string)).collect(),
                unplugged: false,
            }
        }

        pub(crate) fn unplugged(lines: &[Option<&str>]) -> Self {
            Self {
                unplugged: true,
                ..Self::new(lines)
            }
        }
    }

    impl LineSource for Script {
        fn read_line(&mut self) -> io::Result<Option<String>> {
            match self.lines.pop_front() {
                Some(line) => Ok(line),
                None if self.unplugged => Err(io::ErrorKind::BrokenPipe.into()),
                None => Ok(None),
            }
        }
    }

    /// Yields `chunks` one read at a time, then times out forever.
    struct Chunked(VecDeque<Vec<u8>>);

    impl Read for Chunked {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            match self.0.pop_front() {
                Some(chunk) => {
                    buf[..chunk.len()].copy_from_slice(&chunk);
                    Ok(chunk.len())
                }
                None => Err(io::Error::new(io::ErrorKind::TimedOut, "timed out")),
            }
        }
    }

    fn chunked(chunks: &[&[u8]]) -> SerialLink<Chunked> {
        SerialLink::new(Chunked(chunks.iter().map(|c| c.to_vec()).collect()))
    }

    /// A port whose device went away.
    struct Unplugged;

    impl Read for Unplugged {
        fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
            Err(io::ErrorKind::BrokenPipe.into())
        }
    }

    #[test]
    fn reads_lines_and_events() {
        let mut link = chunked(&[b"+1\r\n-1\r\n"]);
        assert_eq!(link.next_event().unwrap(), TouchEvent::Engage(1));
        assert_eq!(link.next_event().unwrap(), TouchEvent::Release(1));
        assert_eq!(link.next_event().unwrap(), TouchEvent::NoEvent);
    }

    #[test]
    fn timeout_without_data_is_no_line() {
        let mut link = chunked(&[]);
        assert_eq!(link.read_line().unwrap(), None);
    }

    #[test]
    fn split_message_is_not_reassembled() {
        // "+" arrives, then the read times out before the digit
        let mut link = chunked(&[b"+"]);
        assert_eq!(link.read_line().unwrap().as_deref(), Some("+"));
        assert_eq!(link.next_event().unwrap(), TouchEvent::NoEvent);

        // both pieces inside one read window still make a whole line
        let mut link = chunked(&[b"+", b"4\n"]);
        assert_eq!(link.next_event().unwrap(), TouchEvent::Engage(4));
    }

    #[test]
    fn non_ascii_is_unreadable() {
        let mut link = chunked(&[b"+\xff1\n"]);
        assert_eq!(link.read_line().unwrap(), None);
    }

    #[test]
    fn unplugged_device_is_an_error() {
        let mut link = SerialLink::new(Unplugged);
        let err = link.next_event().unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::BrokenPipe);
    }

    #[test]
    fn closed_port_is_an_error() {
        let mut link = SerialLink::new(io::empty());
        let err = link.read_line().unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::UnexpectedEof);
    }

    #[test]
    fn interactive_prompts_and_stops_at_end() {
        let mut prompt = vec![];
        let mut source = Interactive::new(Cursor::new("+2\n-2\n"), &mut prompt);
        assert_eq!(source.next_event().unwrap(), TouchEvent::Engage(2));
        assert_eq!(source.next_event().unwrap(), TouchEvent::Release(2));
        assert_eq!(source.next_event().unwrap(), TouchEvent::NoEvent);
        assert_eq!(source.next_event().unwrap(), TouchEvent::NoEvent);
        drop(source);
        assert_eq!(String::from_utf8(prompt).unwrap(), "message: ".repeat(3));
    }

    #[test]
    fn interactive_end_of_input_is_paced() {
        let mut source = Interactive::new(Cursor::new(""), io::sink());
        source.pause = Duration::from_millis(20);
        assert_eq!(source.read_line().unwrap(), None);

        let start = Instant::now();
        for _ in 0..3 {
            assert_eq!(source.next_event().unwrap(), TouchEvent::NoEvent);
        }
        assert!(start.elapsed() >= Duration::from_millis(60));
    }
}
