//! Minimal HTTP/1.1 framing for station streams.
//!
//! Just enough to open an audio stream over a raw TCP socket: build a
//! `GET` request, then parse the response head to learn the status and
//! where the body starts. Shoutcast/Icecast servers that answer with an
//! `ICY 200 OK` status line are accepted as well.

use heapless::String;
use nourl::Url;

use crate::config::{HTTP_USER_AGENT, MAX_URL_LEN};
use crate::error::StreamError;

/// Maximum size of a serialized request.
pub const REQUEST_SIZE: usize = 384;

/// Host, port and path of an `http://` station URL.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Target<'a> {
    pub host: &'a str,
    pub port: u16,
    pub path: &'a str,
}

impl<'a> Target<'a> {
    /// Split a station URL. Only plain `http://` is accepted.
    pub fn parse(url: &'a str) -> Result<Self, StreamError> {
        if url.len() > MAX_URL_LEN {
            return Err(StreamError::InvalidUrl);
        }
        if !url.starts_with("http://") {
            return Err(StreamError::UnsupportedScheme);
        }
        let url = Url::parse(url)?;
        let path = if url.path().is_empty() { "/" } else { url.path() };

        Ok(Target {
            host: url.host(),
            port: url.port_or_default(),
            path,
        })
    }
}

/// A `GET` request under construction.
pub struct Request {
    buf: String<REQUEST_SIZE>,
}

impl Request {
    /// Start a `GET` for `target` with the `Host`, `User-Agent` and
    /// `Connection` headers already set.
    pub fn get(target: &Target<'_>) -> Result<Self, StreamError> {
        let mut request = Request { buf: String::new() };
        request.push("GET ")?;
        request.push(target.path)?;
        request.push(" HTTP/1.1\r\n")?;
        request.header("Host", target.host)?;
        request.header("User-Agent", HTTP_USER_AGENT)?;
        request.header("Accept", "*/*")?;
        request.header("Connection", "close")?;
        Ok(request)
    }

    /// Adds a header to the request.
    pub fn header(&mut self, key: &str, value: &str) -> Result<&mut Self, StreamError> {
        self.push(key)?;
        self.push(": ")?;
        self.push(value)?;
        self.push("\r\n")?;
        Ok(self)
    }

    /// Terminate the head and return the bytes to send.
    pub fn finish(mut self) -> Result<String<REQUEST_SIZE>, StreamError> {
        self.push("\r\n")?;
        Ok(self.buf)
    }

    fn push(&mut self, s: &str) -> Result<(), StreamError> {
        self.buf.push_str(s).map_err(|_| StreamError::Request)
    }
}

/// Status class of an HTTP response.
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ResponseStatusCode {
    Informational(u16),
    Successful(u16),
    Redirection(u16),
    ClientError(u16),
    ServerError(u16),
    Invalid(u16),
    #[default]
    Unknown,
}

impl From<u16> for ResponseStatusCode {
    fn from(value: u16) -> Self {
        match value {
            100..200 => Self::Informational(value),
            200..300 => Self::Successful(value),
            300..400 => Self::Redirection(value),
            400..500 => Self::ClientError(value),
            500..600 => Self::ServerError(value),
            _ => Self::Invalid(value),
        }
    }
}

impl From<Option<u16>> for ResponseStatusCode {
    fn from(value: Option<u16>) -> Self {
        match value {
            Some(status_code) => ResponseStatusCode::from(status_code),
            None => ResponseStatusCode::Unknown,
        }
    }
}

impl ResponseStatusCode {
    pub fn is_success(&self) -> bool {
        matches!(self, ResponseStatusCode::Successful(_))
    }
}

/// Parsed response head.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResponseHead {
    pub status: ResponseStatusCode,
    /// Length of the head including the blank line; the body starts here.
    pub size: usize,
}

impl ResponseHead {
    /// Parse a response head from the start of `buf`.
    ///
    /// Returns `Ok(None)` while the head is still incomplete.
    pub fn parse(buf: &[u8]) -> Result<Option<ResponseHead>, StreamError> {
        if buf.starts_with(b"ICY ") {
            return Ok(Self::parse_icy(buf));
        }

        let mut headers = [httparse::EMPTY_HEADER; 32];
        let mut response = httparse::Response::new(&mut headers);

        match response.parse(buf)? {
            httparse::Status::Complete(size) => Ok(Some(ResponseHead {
                status: ResponseStatusCode::from(response.code),
                size,
            })),
            httparse::Status::Partial => Ok(None),
        }
    }

    /// `ICY 200 OK` heads: status digits after the tag, headers until the
    /// first blank line.
    fn parse_icy(buf: &[u8]) -> Option<ResponseHead> {
        let end = buf.windows(4).position(|w| w == b"\r\n\r\n")? + 4;

        let code = buf[4..]
            .iter()
            .take_while(|b| b.is_ascii_digit())
            .try_fold(0u16, |acc, b| {
                acc.checked_mul(10)?.checked_add(u16::from(b - b'0'))
            });

        Some(ResponseHead {
            status: ResponseStatusCode::from(code),
            size: end,
        })
    }
}
