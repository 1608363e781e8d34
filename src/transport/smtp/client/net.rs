use std::{
    fmt::{self, Debug, Formatter},
    io::{self, Read, Write},
    net::{Shutdown, SocketAddr, TcpStream, ToSocketAddrs},
    time::Duration,
};

#[cfg(feature = "native-tls")]
use native_tls::TlsStream;

use super::TlsParameters;
use crate::transport::smtp::{error, Error};

/// The socket of a session, in plaintext or encrypted
pub struct NetworkStream {
    inner: Inner,
}

enum Inner {
    Tcp(TcpStream),
    #[cfg(feature = "native-tls")]
    Tls(Box<TlsStream<TcpStream>>),
}

impl NetworkStream {
    /// Connects to the first address of `server` accepting the connection
    ///
    /// `timeout` bounds the connection attempt and every read and write
    /// afterwards. With `wrapper` the TLS handshake is run right away.
    pub fn connect<A: ToSocketAddrs>(
        server: A,
        timeout: Option<Duration>,
        wrapper: Option<&TlsParameters>,
    ) -> Result<Self, Error> {
        let mut last_error = None;
        let mut tcp = None;
        for addr in server.to_socket_addrs().map_err(error::connection)? {
            let attempt = match timeout {
                Some(timeout) => TcpStream::connect_timeout(&addr, timeout),
                None => TcpStream::connect(addr),
            };
            match attempt {
                Ok(stream) => {
                    tcp = Some(stream);
                    break;
                }
                Err(err) => last_error = Some(err),
            }
        }
        let tcp = match (tcp, last_error) {
            (Some(tcp), _) => tcp,
            (None, Some(err)) => return Err(error::connection(err)),
            (None, None) => return Err(error::connection("the server has no address")),
        };

        tcp.set_read_timeout(timeout).map_err(error::network)?;
        tcp.set_write_timeout(timeout).map_err(error::network)?;

        let mut stream = Self {
            inner: Inner::Tcp(tcp),
        };
        if let Some(parameters) = wrapper {
            stream.upgrade_tls(parameters)?;
        }
        Ok(stream)
    }

    /// Runs the TLS handshake, nothing happens on an encrypted stream
    #[cfg(feature = "native-tls")]
    pub fn upgrade_tls(&mut self, parameters: &TlsParameters) -> Result<(), Error> {
        let Inner::Tcp(tcp) = &self.inner else {
            return Ok(());
        };
        // the handshake needs its own handle, both refer to the same socket
        let handle = tcp.try_clone().map_err(error::network)?;
        let tls = parameters
            .connector
            .connect(parameters.domain(), handle)
            .map_err(error::tls)?;
        self.inner = Inner::Tls(Box::new(tls));
        Ok(())
    }

    #[cfg(not(feature = "native-tls"))]
    pub fn upgrade_tls(&mut self, _parameters: &TlsParameters) -> Result<(), Error> {
        Err(error::client("TLS requires the native-tls feature"))
    }

    pub fn is_encrypted(&self) -> bool {
        !matches!(self.inner, Inner::Tcp(_))
    }

    fn tcp(&self) -> &TcpStream {
        match &self.inner {
            Inner::Tcp(tcp) => tcp,
            #[cfg(feature = "native-tls")]
            Inner::Tls(tls) => tls.get_ref(),
        }
    }

    pub fn peer_addr(&self) -> io::Result<SocketAddr> {
        self.tcp().peer_addr()
    }

    pub fn shutdown(&self, how: Shutdown) -> io::Result<()> {
        self.tcp().shutdown(how)
    }

    fn io(&mut self) -> &mut dyn ReadWrite {
        match &mut self.inner {
            Inner::Tcp(tcp) => tcp,
            #[cfg(feature = "native-tls")]
            Inner::Tls(tls) => tls.as_mut(),
        }
    }
}

trait ReadWrite: Read + Write {}

impl<T: Read + Write> ReadWrite for T {}

impl Read for NetworkStream {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.io().read(buf)
    }
}

impl Write for NetworkStream {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.io().write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.io().flush()
    }
}

impl Debug for NetworkStream {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("NetworkStream")
            .field("peer", &self.peer_addr().ok())
            .field("encrypted", &self.is_encrypted())
            .finish()
    }
}
