//! Connection to a long-lived hg helper
//!
//! The helper accepts `log <path>\n` and answers with raw `hg log` text,
//! closing the connection when done.

use std::fmt;
use std::io::{self, Read, Write};
use std::net::TcpStream;
#[cfg(unix)]
use std::os::unix::net::UnixStream;
#[cfg(unix)]
use std::path::PathBuf;
use std::str::FromStr;

use super::HgError;
use super::constants::daemon;

/// Where the daemon listens
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DaemonAddress {
    /// `host:port`
    Tcp(String),
    /// `unix:/path/to/socket`
    #[cfg(unix)]
    Unix(PathBuf),
}

impl FromStr for DaemonAddress {
    type Err = HgError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if let Some(path) = s.strip_prefix(daemon::UNIX_SCHEME) {
            #[cfg(unix)]
            {
                if path.is_empty() {
                    return Err(HgError::InvalidDaemonAddress(s.to_string()));
                }
                return Ok(Self::Unix(PathBuf::from(path)));
            }
            #[cfg(not(unix))]
            {
                let _ = path;
                return Err(HgError::InvalidDaemonAddress(s.to_string()));
            }
        }

        match s.rsplit_once(':') {
            Some((host, port)) if !host.is_empty() && port.parse::<u16>().is_ok() => {
                Ok(Self::Tcp(s.to_string()))
            }
            _ => Err(HgError::InvalidDaemonAddress(s.to_string())),
        }
    }
}

impl fmt::Display for DaemonAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Tcp(addr) => write!(f, "{addr}"),
            #[cfg(unix)]
            Self::Unix(path) => write!(f, "{}{}", daemon::UNIX_SCHEME, path.display()),
        }
    }
}

/// Open daemon connection
#[derive(Debug)]
pub enum DaemonStream {
    Tcp(TcpStream),
    #[cfg(unix)]
    Unix(UnixStream),
}

impl DaemonAddress {
    pub fn connect(&self) -> io::Result<DaemonStream> {
        match self {
            Self::Tcp(addr) => TcpStream::connect(addr.as_str()).map(DaemonStream::Tcp),
            #[cfg(unix)]
            Self::Unix(path) => UnixStream::connect(path).map(DaemonStream::Unix),
        }
    }

    /// Connect and send a log request for `path`
    ///
    /// The returned stream yields the raw log text until the daemon closes it.
    pub fn request_log(&self, path: &str) -> Result<DaemonStream, HgError> {
        let wrap = |source: io::Error| HgError::Daemon {
            address: self.to_string(),
            source,
        };

        let mut stream = self.connect().map_err(wrap)?;
        let request = format!("{}{}\n", daemon::LOG_REQUEST, path);
        stream.write_all(request.as_bytes()).map_err(wrap)?;
        stream.flush().map_err(wrap)?;
        Ok(stream)
    }
}

impl Read for DaemonStream {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match self {
            Self::Tcp(stream) => stream.read(buf),
            #[cfg(unix)]
            Self::Unix(stream) => stream.read(buf),
        }
    }
}

impl Write for DaemonStream {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            Self::Tcp(stream) => stream.write(buf),
            #[cfg(unix)]
            Self::Unix(stream) => stream.write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            Self::Tcp(stream) => stream.flush(),
            #[cfg(unix)]
            Self::Unix(stream) => stream.flush(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{BufRead, BufReader};
    use std::net::TcpListener;
    use std::thread;

    #[test]
    fn test_parse_tcp_address() {
        let addr: DaemonAddress = "127.0.0.1:4242".parse().unwrap();
        assert_eq!(addr, DaemonAddress::Tcp("127.0.0.1:4242".to_string()));
        assert_eq!(addr.to_string(), "127.0.0.1:4242");
    }

    #[test]
    fn test_parse_invalid_address() {
        for input in ["", "localhost", "localhost:notaport", ":4242", "host:99999"] {
            assert!(
                matches!(
                    input.parse::<DaemonAddress>(),
                    Err(HgError::InvalidDaemonAddress(_))
                ),
                "{input}"
            );
        }
    }

    #[cfg(unix)]
    #[test]
    fn test_parse_unix_address() {
        let addr: DaemonAddress = "unix:/tmp/hg.sock".parse().unwrap();
        assert_eq!(addr, DaemonAddress::Unix(PathBuf::from("/tmp/hg.sock")));
        assert_eq!(addr.to_string(), "unix:/tmp/hg.sock");
        assert!("unix:".parse::<DaemonAddress>().is_err());
    }

    #[test]
    fn test_request_log_sends_single_line() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();

        let server = thread::spawn(move || {
            let (stream, _) = listener.accept().unwrap();
            let mut request = String::new();
            BufReader::new(stream.try_clone().unwrap())
                .read_line(&mut request)
                .unwrap();
            let mut stream = stream;
            stream.write_all(b"changeset: 1\n").unwrap();
            request
        });

        let addr = DaemonAddress::Tcp(format!("127.0.0.1:{port}"));
        let mut stream = addr.request_log("src/main.rs").unwrap();
        let mut response = String::new();
        stream.read_to_string(&mut response).unwrap();

        assert_eq!(server.join().unwrap(), "log src/main.rs\n");
        assert_eq!(response, "changeset: 1\n");
    }

    #[cfg(unix)]
    #[test]
    fn test_request_log_over_unix_socket() {
        use std::os::unix::net::UnixListener;

        let dir = tempfile::TempDir::new().unwrap();
        let socket = dir.path().join("hg.sock");
        let listener = UnixListener::bind(&socket).unwrap();

        let server = thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            let mut request = String::new();
            BufReader::new(stream.try_clone().unwrap())
                .read_line(&mut request)
                .unwrap();
            stream.write_all(b"changeset: 2\nuser: carol\n").unwrap();
            request
        });

        let addr = DaemonAddress::Unix(socket);
        let mut stream = addr.request_log("docs/README").unwrap();
        assert!(matches!(stream, DaemonStream::Unix(_)));
        let mut response = String::new();
        stream.read_to_string(&mut response).unwrap();

        assert_eq!(server.join().unwrap(), "log docs/README\n");
        assert_eq!(response, "changeset: 2\nuser: carol\n");
    }

    #[cfg(unix)]
    #[test]
    fn test_unix_connect_failure() {
        let dir = tempfile::TempDir::new().unwrap();
        let addr = DaemonAddress::Unix(dir.path().join("missing.sock"));

        match addr.request_log("file") {
            Err(HgError::Daemon { address, .. }) => {
                assert!(address.starts_with("unix:"), "{address}");
            }
            other => panic!("expected Daemon error, got {other:?}"),
        }
    }

    #[test]
    fn test_request_log_connect_failure() {
        // Bind then drop to get a port with no listener
        let port = TcpListener::bind("127.0.0.1:0")
            .unwrap()
            .local_addr()
            .unwrap()
            .port();
        let addr = DaemonAddress::Tcp(format!("127.0.0.1:{port}"));

        assert!(matches!(
            addr.request_log("file"),
            Err(HgError::Daemon { .. })
        ));
    }
}
