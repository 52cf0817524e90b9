pub mod config;
pub mod http_status;
pub mod request_handler;
pub mod signal;

use log::{debug, error, info};
use std::io;
use std::net::{Ipv4Addr, SocketAddr, TcpListener};
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::Duration;

use config::ServerConfig;

pub struct HttpServer {
    listener: TcpListener,
    serving_root: PathBuf,
}

impl HttpServer {
    /// Binds the listener to the loopback interface on the configured port.
    /// The bind address is not configurable: the server must never be
    /// reachable from another host.
    pub fn bind(config: &ServerConfig, serving_root: PathBuf) -> io::Result<Self> {
        let listener = TcpListener::bind((Ipv4Addr::LOCALHOST, config.port))?;
        listener.set_nonblocking(true)?;

        info!("Server started on {}", listener.local_addr()?);

        Ok(Self {
            listener,
            serving_root,
        })
    }

    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Accepts and handles connections one at a time until `shutdown` is set
    /// or accepting fails. The listener is closed when the server is dropped,
    /// whichever way this returns.
    pub fn run(&self, shutdown: &AtomicBool) -> io::Result<()> {
        loop {
            if shutdown.load(Ordering::SeqCst) {
                info!("Shutdown requested, closing listener");
                return Ok(());
            }

            match self.listener.accept() {
                Ok((stream, addr)) => {
                    debug!("New connection from {}", addr);
                    // Accepted sockets can inherit the listener's non-blocking flag.
                    if let Err(e) = stream.set_nonblocking(false) {
                        error!("Failed to set blocking mode for {}: {}", addr, e);
                        continue;
                    }
                    request_handler::handle_client(stream, &self.serving_root);
                }
                Err(e) if e.kind() == io::ErrorKind::WouldBlock => {
                    thread::sleep(Duration::from_millis(1));
                }
                Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
                Err(e) => {
                    error!("Error accepting connection: {}", e);
                    return Err(e);
                }
            }
        }
    }
}
