//! Configuration constants.
//!
//! Defaults used when a host is started without an explicit configuration.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};

/// Address the mock server binds to by default: loopback with an OS-assigned port.
pub const DEFAULT_BIND_ADDR: SocketAddr = SocketAddr::new(IpAddr::V4(Ipv4Addr::LOCALHOST), 0);

/// Worker threads of the runtime serving a single host.
pub const DEFAULT_WORKER_THREADS: usize = 2;

/// Name given to the thread that owns a host's runtime.
pub const SERVER_THREAD_NAME: &str = "mock-api-server";
