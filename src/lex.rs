use std::io::{self, Read};

use crate::error::{PostScriptError, PostScriptResult};

const FORM_FEED: u8 = b'\x0C';

/// Whitespace chars are defined as
///
/// * NUL             0x0
/// * Horizontal tab  0x9
/// * Line feed       0xa
/// * Form feed       0xc
/// * Carriage return 0xd
/// * Space           0x20
///
pub(crate) fn is_whitespace(b: u8) -> bool {
    matches!(b, b'\0' | 0x9 | b'\n' | FORM_FEED | b'\r' | b' ')
}

/// Procedure braces are the only delimiters in a calculator function. They end
/// the token before them and are tokens of their own
pub(crate) fn is_delimiter(b: u8) -> bool {
    matches!(b, b'{' | b'}')
}

/// A fixed size window over a byte stream.
///
/// The bytes of the token currently being lexed are kept contiguous: when the
/// cursor runs off the end of the filled region, the partial token is moved to
/// the front of the buffer and the remainder is refilled from the reader.
#[derive(Debug)]
pub(crate) struct ScanBuffer<R> {
    reader: R,
    buffer: Box<[u8]>,

    /// Number of valid bytes in `buffer`
    filled: usize,
    cursor: usize,

    /// Start of the token in progress, if any
    token_start: Option<usize>,

    /// The reader has reported end of data and will not be polled again
    eof: bool,
}

impl<R: Read> ScanBuffer<R> {
    /// Tokens of up to `capacity` bytes are accepted. One extra byte is kept so
    /// the byte after a full-length token can still be peeked
    pub fn with_capacity(reader: R, capacity: usize) -> Self {
        Self {
            reader,
            buffer: vec![0; capacity.max(1) + 1].into_boxed_slice(),
            filled: 0,
            cursor: 0,
            token_start: None,
            eof: false,
        }
    }

    pub fn peek_byte(&mut self) -> PostScriptResult<Option<u8>> {
        if self.cursor == self.filled && !self.refill()? {
            return Ok(None);
        }

        Ok(Some(self.buffer[self.cursor]))
    }

    /// Consumes the byte last returned by `peek_byte`
    pub fn advance(&mut self) {
        debug_assert!(self.cursor < self.filled);
        self.cursor += 1;
    }

    /// Marks the byte under the cursor as the first byte of a new token
    pub fn start_token(&mut self) {
        self.token_start = Some(self.cursor);
    }

    /// Ends the token in progress, returning every byte consumed since
    /// `start_token`
    pub fn take_token(&mut self) -> &[u8] {
        let start = self.token_start.take().unwrap_or(self.cursor);
        &self.buffer[start..self.cursor]
    }

    /// Returns `false` once the reader is exhausted
    fn refill(&mut self) -> PostScriptResult<bool> {
        if self.eof {
            return Ok(false);
        }

        let keep_from = self.token_start.unwrap_or(self.cursor);

        if keep_from > 0 {
            self.buffer.copy_within(keep_from..self.filled, 0);
            self.filled -= keep_from;
            self.cursor -= keep_from;
            self.token_start = self.token_start.map(|start| start - keep_from);
        }

        if self.filled == self.buffer.len() {
            // a single token spans the entire buffer
            anyhow::bail!(PostScriptError::LimitCheck);
        }

        loop {
            match self.reader.read(&mut self.buffer[self.filled..]) {
                Ok(0) => {
                    self.eof = true;
                    return Ok(false);
                }
                Ok(n) => {
                    self.filled += n;
                    return Ok(true);
                }
                Err(err) if err.kind() == io::ErrorKind::Interrupted => continue,
                Err(err) => return Err(err.into()),
            }
        }
    }
}
