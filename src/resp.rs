use bytes::{Buf, BytesMut};

/// Upper bound on a single bulk string payload.
const MAX_BULK_LEN: i64 = 512 * 1024 * 1024;
/// Upper bound on the element count of a request array.
const MAX_ARRAY_LEN: i64 = 1024 * 1024;

/// A RESP2 value, restricted to what requests and replies use.
#[derive(Debug, Clone, PartialEq)]
pub enum RespValue {
    /// +OK\r\n
    SimpleString(String),
    /// -ERR message\r\n
    Error(String),
    /// $6\r\nfoobar\r\n  or  $-1\r\n (null)
    BulkString(Option<Vec<u8>>),
    /// *2\r\n...  or  *-1\r\n (null)
    Array(Option<Vec<RespValue>>),
}

impl RespValue {
    pub fn ok() -> Self {
        RespValue::SimpleString("OK".to_string())
    }

    pub fn simple_string(s: impl Into<String>) -> Self {
        RespValue::SimpleString(s.into())
    }

    pub fn error(s: impl Into<String>) -> Self {
        RespValue::Error(s.into())
    }

    pub fn bulk_string(data: impl Into<Vec<u8>>) -> Self {
        RespValue::BulkString(Some(data.into()))
    }

    pub fn null_bulk_string() -> Self {
        RespValue::BulkString(None)
    }

    pub fn array(items: Vec<RespValue>) -> Self {
        RespValue::Array(Some(items))
    }

    /// Build a request frame (array of bulk strings) from command tokens.
    pub fn command<I, S>(parts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        RespValue::array(
            parts
                .into_iter()
                .map(|p| RespValue::bulk_string(p.as_ref().as_bytes()))
                .collect(),
        )
    }

    /// Serialize this value to RESP bytes.
    pub fn serialize(&self) -> Vec<u8> {
        let mut buf = Vec::new();
        self.write_to(&mut buf);
        buf
    }

    /// Write RESP bytes into the given buffer.
    pub fn write_to(&self, buf: &mut Vec<u8>) {
        match self {
            RespValue::SimpleString(s) => {
                buf.push(b'+');
                buf.extend_from_slice(s.as_bytes());
                buf.extend_from_slice(b"\r\n");
            }
            RespValue::Error(s) => {
                buf.push(b'-');
                buf.extend_from_slice(s.as_bytes());
                buf.extend_from_slice(b"\r\n");
            }
            RespValue::BulkString(None) => {
                buf.extend_from_slice(b"$-1\r\n");
            }
            RespValue::BulkString(Some(data)) => {
                buf.push(b'$');
                buf.extend_from_slice(data.len().to_string().as_bytes());
                buf.extend_from_slice(b"\r\n");
                buf.extend_from_slice(data);
                buf.extend_from_slice(b"\r\n");
            }
            RespValue::Array(None) => {
                buf.extend_from_slice(b"*-1\r\n");
            }
            RespValue::Array(Some(items)) => {
                buf.push(b'*');
                buf.extend_from_slice(items.len().to_string().as_bytes());
                buf.extend_from_slice(b"\r\n");
                for item in items {
                    item.write_to(buf);
                }
            }
        }
    }

    /// Raw bytes of a string-like value.
    pub fn as_str(&self) -> Option<&[u8]> {
        match self {
            RespValue::BulkString(Some(data)) => Some(data),
            RespValue::SimpleString(s) => Some(s.as_bytes()),
            _ => None,
        }
    }

    /// Convert to a UTF-8 string, if possible.
    pub fn to_string_lossy(&self) -> Option<String> {
        self.as_str()
            .map(|b| String::from_utf8_lossy(b).into_owned())
    }
}

/// Request parser.
///
/// A request is either an array of bulk strings or an inline command line.
/// Returns `Ok(Some(value))` when a complete request is present (and consumes it),
/// `Ok(None)` when the buffer holds only part of one.
pub struct RespParser;

impl RespParser {
    pub fn parse(buf: &mut BytesMut) -> Result<Option<RespValue>, RespError> {
        if buf.is_empty() {
            return Ok(None);
        }

        match buf[0] {
            b'*' => Self::parse_array(buf),
            _ => Self::parse_inline(buf),
        }
    }

    /// Parse an inline command (plain text terminated by \n or \r\n).
    /// Converts it to a RESP array of bulk strings.
    fn parse_inline(buf: &mut BytesMut) -> Result<Option<RespValue>, RespError> {
        let newline = match buf.iter().position(|&b| b == b'\n') {
            Some(pos) => pos,
            None => return Ok(None),
        };

        let line = &buf[..newline];
        let line = line.strip_suffix(b"\r").unwrap_or(line);
        let line_str = String::from_utf8_lossy(line).into_owned();
        buf.advance(newline + 1);

        let parts = split_inline_command(&line_str)?;
        let items = parts
            .into_iter()
            .map(|s| RespValue::BulkString(Some(s.into_bytes())))
            .collect();

        Ok(Some(RespValue::Array(Some(items))))
    }

    fn parse_bulk_string(buf: &mut BytesMut) -> Result<Option<RespValue>, RespError> {
        let crlf = match find_crlf_from(buf, 1) {
            Some(pos) => pos,
            None => return Ok(None),
        };

        let len = parse_length(&buf[1..crlf], "invalid bulk length")?;

        if len == -1 {
            buf.advance(crlf + 2);
            return Ok(Some(RespValue::BulkString(None)));
        }

        if !(0..=MAX_BULK_LEN).contains(&len) {
            return Err(RespError::InvalidData("invalid bulk length".into()));
        }
        let len = len as usize;
        let total_needed = crlf + 2 + len + 2;

        if buf.len() < total_needed {
            return Ok(None);
        }

        if &buf[crlf + 2 + len..total_needed] != b"\r\n" {
            return Err(RespError::InvalidData(
                "missing trailing CRLF after bulk string".into(),
            ));
        }

        let data = buf[crlf + 2..crlf + 2 + len].to_vec();
        buf.advance(total_needed);
        Ok(Some(RespValue::BulkString(Some(data))))
    }

    fn parse_array(buf: &mut BytesMut) -> Result<Option<RespValue>, RespError> {
        let crlf = match find_crlf_from(buf, 1) {
            Some(pos) => pos,
            None => return Ok(None),
        };

        let len = parse_length(&buf[1..crlf], "invalid multibulk length")?;

        if len < 0 {
            buf.advance(crlf + 2);
            return Ok(Some(RespValue::Array(None)));
        }

        if len > MAX_ARRAY_LEN {
            return Err(RespError::InvalidData("invalid multibulk length".into()));
        }

        let len = len as usize;

        // Restore the buffer if the array turns out to be incomplete.
        let saved = buf.clone();
        buf.advance(crlf + 2);

        let mut items = Vec::with_capacity(len);
        for _ in 0..len {
            let parsed = match buf.first() {
                Some(&b'$') => Self::parse_bulk_string(buf)?,
                Some(&other) => return Err(RespError::InvalidByte(other)),
                None => None,
            };
            match parsed {
                Some(val) => items.push(val),
                None => {
                    *buf = saved;
                    return Ok(None);
                }
            }
        }

        Ok(Some(RespValue::Array(Some(items))))
    }
}

fn parse_length(digits: &[u8], what: &str) -> Result<i64, RespError> {
    std::str::from_utf8(digits)
        .ok()
        .and_then(|s| s.parse().ok())
        .ok_or_else(|| RespError::InvalidData(what.into()))
}

/// Find \r\n starting from the given position.
fn find_crlf_from(buf: &[u8], start: usize) -> Option<usize> {
    if buf.len() < start + 2 {
        return None;
    }
    (start..buf.len() - 1).find(|&i| buf[i] == b'\r' && buf[i + 1] == b'\n')
}

/// Split an inline command into tokens, respecting quoted strings.
fn split_inline_command(line: &str) -> Result<Vec<String>, RespError> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(ch) = chars.next() {
        if in_quotes {
            if ch == '"' {
                in_quotes = false;
            } else if ch == '\\' {
                match chars.peek() {
                    Some(&next) if next == '"' || next == '\\' => {
                        current.push(next);
                        chars.next();
                    }
                    Some(&'n') => {
                        current.push('\n');
                        chars.next();
                    }
                    _ => current.push(ch),
                }
            } else {
                current.push(ch);
            }
        } else if ch == '"' {
            in_quotes = true;
        } else if ch == '\'' {
            // No escape processing inside single quotes
            for ch in chars.by_ref() {
                if ch == '\'' {
                    break;
                }
                current.push(ch);
            }
        } else if ch.is_whitespace() {
            if !current.is_empty() {
                tokens.push(std::mem::take(&mut current));
            }
        } else {
            current.push(ch);
        }
    }

    if in_quotes {
        return Err(RespError::InvalidData("unbalanced quotes in request".into()));
    }

    if !current.is_empty() {
        tokens.push(current);
    }

    Ok(tokens)
}

#[derive(Debug, thiserror::Error)]
pub enum RespError {
    #[error("expected '$', got '{}'", *.0 as char)]
    InvalidByte(u8),

    #[error("{0}")]
    InvalidData(String),
}
