use std::net::SocketAddr;

use tokio::io::AsyncReadExt;
use tokio::net::{TcpListener, TcpSocket, TcpStream};

use crate::error::{Result, RouteArtError};

const ENABLE_LOGS: bool = true;

use crate::{log_debug, log_info};

const READ_BUFFER_BYTES: usize = 2048;
const FRAME_DELIMITER: char = '%';
const EMPTY_FRAME: &str = "{}";

/// Live payloads from a single connected phone.
pub struct SocketReceiver {
    stream: TcpStream,
    peer: SocketAddr,
}

impl SocketReceiver {
    /// Bind `addr` and block until one client connects.
    pub async fn listen(addr: SocketAddr) -> Result<Self> {
        let socket = if addr.is_ipv4() {
            TcpSocket::new_v4()?
        } else {
            TcpSocket::new_v6()?
        };
        socket.set_reuseaddr(true)?;
        socket.bind(addr)?;
        let listener = socket.listen(1)?;
        log_info!("Waiting for location client on {}", addr);
        Self::accept(&listener).await
    }

    pub async fn accept(listener: &TcpListener) -> Result<Self> {
        let (stream, peer) = listener.accept().await?;
        log_info!("Location client connected from {}", peer);
        Ok(Self { stream, peer })
    }

    pub fn peer(&self) -> SocketAddr {
        self.peer
    }

    /// First non-empty `%`-delimited frame of the next read.
    pub async fn get_raw_location_data(&mut self) -> Result<String> {
        let mut buffer = [0u8; READ_BUFFER_BYTES];
        let read = self.stream.read(&mut buffer).await?;
        let contents = String::from_utf8_lossy(&buffer[..read]);
        log_debug!("Received {} bytes from {}", read, self.peer);
        first_frame(&contents)
    }
}

fn first_frame(contents: &str) -> Result<String> {
    let frames: Vec<&str> = contents.split(FRAME_DELIMITER).collect();
    frames
        .iter()
        .map(|frame| frame.trim())
        .find(|frame| !frame.is_empty() && *frame != EMPTY_FRAME)
        .map(str::to_string)
        .ok_or_else(|| RouteArtError::NoValidFrame {
            frames: frames.iter().map(|frame| frame.to_string()).collect(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::AsyncWriteExt;

    #[test]
    fn skips_empty_frames() {
        let frame = first_frame("{}%{'network': {'latitude': 1, 'longitude': 2}}%{}").unwrap();
        assert_eq!(frame, "{'network': {'latitude': 1, 'longitude': 2}}");
    }

    #[test]
    fn all_empty_frames_fail() {
        match first_frame("{}%{}%") {
            Err(RouteArtError::NoValidFrame { frames }) => assert_eq!(frames, ["{}", "{}", ""]),
            other => panic!("expected NoValidFrame, got {other:?}"),
        }
        assert!(matches!(first_frame(""), Err(RouteArtError::NoValidFrame { .. })));
    }

    #[tokio::test]
    async fn reads_frames_from_connected_client() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let client = tokio::spawn(async move {
            let mut stream = TcpStream::connect(addr).await.unwrap();
            stream
                .write_all(b"{}%{\"network\": {\"latitude\": 3.5, \"longitude\": 4.5}}%")
                .await
                .unwrap();
            stream
        });

        let mut receiver = SocketReceiver::accept(&listener).await.unwrap();
        let _stream = client.await.unwrap();
        let raw = receiver.get_raw_location_data().await.unwrap();
        assert_eq!(
            crate::receivers::parse_location(&raw).unwrap(),
            crate::geo::GeoFix::new(3.5, 4.5)
        );
    }

    #[tokio::test]
    async fn closed_connection_has_no_frame() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let client = tokio::spawn(async move {
            drop(TcpStream::connect(addr).await.unwrap());
        });

        let mut receiver = SocketReceiver::accept(&listener).await.unwrap();
        client.await.unwrap();
        assert!(matches!(
            receiver.get_raw_location_data().await,
            Err(RouteArtError::NoValidFrame { .. })
        ));
    }
}
