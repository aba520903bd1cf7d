//! [`StationStream`] over an embassy-net TCP socket.
//!
//! One socket is reused for every station: [`StationStream::end`] aborts
//! it, which leaves it closed and ready for the next `connect`.

use embassy_net::dns::DnsQueryType;
use embassy_net::tcp::TcpSocket;
use embassy_net::Stack;
use embassy_time::Duration;
use embedded_io_async::Write;

use crate::config::HTTP_HEADER_BUFFER_SIZE;
use crate::error::{Error, StreamError};
use crate::radio::http::{Request, ResponseHead, ResponseStatusCode, Target};
use crate::radio::StationStream;

/// Socket inactivity timeout while streaming.
const SOCKET_TIMEOUT: Duration = Duration::from_secs(15);

pub struct NetStream<'a> {
    stack: Stack<'a>,
    socket: TcpSocket<'a>,
    head: [u8; HTTP_HEADER_BUFFER_SIZE],
    open: bool,
}

impl<'a> NetStream<'a> {
    pub fn new(stack: Stack<'a>, rx_buffer: &'a mut [u8], tx_buffer: &'a mut [u8]) -> Self {
        let mut socket = TcpSocket::new(stack, rx_buffer, tx_buffer);
        socket.set_timeout(Some(SOCKET_TIMEOUT));

        Self {
            stack,
            socket,
            head: [0; HTTP_HEADER_BUFFER_SIZE],
            open: false,
        }
    }

    async fn open(&mut self, url: &str) -> Result<ResponseStatusCode, StreamError> {
        let target = Target::parse(url)?;
        debug!(
            "Host = {}, Path = {}, Port = {}",
            target.host, target.path, target.port
        );

        if !self.stack.is_config_up() {
            warn!("Network not configured yet");
            return Err(StreamError::Dns);
        }

        let addresses = self
            .stack
            .dns_query(target.host, DnsQueryType::A)
            .await
            .map_err(|_| StreamError::Dns)?;
        let address = *addresses.first().ok_or(StreamError::Dns)?;

        self.socket
            .connect((address, target.port))
            .await
            .map_err(|_| StreamError::Connect)?;

        let request = Request::get(&target)?.finish()?;
        self.socket
            .write_all(request.as_bytes())
            .await
            .map_err(|_| StreamError::Request)?;
        self.socket
            .flush()
            .await
            .map_err(|_| StreamError::Request)?;

        let head = self.read_head().await?;
        Ok(head.status)
    }

    /// Read the response head one byte at a time so no body bytes are
    /// consumed with it.
    async fn read_head(&mut self) -> Result<ResponseHead, StreamError> {
        let mut pos = 0;

        while pos < self.head.len() {
            match self.socket.read(&mut self.head[pos..pos + 1]).await {
                Ok(0) => return Err(StreamError::BadResponse),
                Ok(n) => pos += n,
                Err(_) => return Err(StreamError::Read),
            }

            if self.head[..pos].ends_with(b"\r\n\r\n") {
                return ResponseHead::parse(&self.head[..pos])?.ok_or(StreamError::BadResponse);
            }
        }

        warn!("Response head exceeds {} bytes", HTTP_HEADER_BUFFER_SIZE);
        Err(StreamError::BadResponse)
    }
}

impl StationStream for NetStream<'_> {
    async fn get(&mut self, url: &str) -> Result<ResponseStatusCode, Error> {
        self.end();

        let status = self.open(url).await?;
        self.open = true;
        Ok(status)
    }

    fn available(&mut self) -> bool {
        // A closed peer counts as readable so the next read reports EOF.
        self.open && (self.socket.recv_queue() > 0 || !self.socket.may_recv())
    }

    async fn read(&mut self, buf: &mut [u8]) -> Result<usize, Error> {
        if !self.open {
            return Err(StreamError::NotOpen.into());
        }
        self.socket
            .read(buf)
            .await
            .map_err(|_| StreamError::Read.into())
    }

    fn end(&mut self) {
        self.open = false;
        self.socket.abort();
    }
}
