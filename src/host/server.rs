//! Background server driving a host.
//!
//! Each host owns one OS thread running a multi-threaded tokio runtime, so the
//! host works the same from synchronous tests and from inside another runtime.

use std::future::IntoFuture;
use std::net::{SocketAddr, TcpListener as StdTcpListener};
use std::thread::{self, JoinHandle};

use axum::Router;
use tokio::runtime::Runtime;
use tokio::sync::oneshot;

use crate::config::{MockHostConfig, SERVER_THREAD_NAME};
use crate::error_handling::MockHostError;

/// Handle on a running server thread.
#[derive(Debug)]
pub(crate) struct ServerHandle {
    addr: SocketAddr,
    shutdown: Option<oneshot::Sender<()>>,
    thread: Option<JoinHandle<()>>,
}

impl ServerHandle {
    /// Binds the listener on the calling thread, then serves `app` on a new one.
    ///
    /// Binding up front means a port conflict is reported to the caller
    /// instead of surfacing later on the server thread.
    pub(crate) fn spawn(config: &MockHostConfig, app: Router) -> Result<Self, MockHostError> {
        let bind_error = |source| MockHostError::Bind {
            addr: config.bind_addr,
            source,
        };
        let listener = StdTcpListener::bind(config.bind_addr).map_err(bind_error)?;
        listener.set_nonblocking(true).map_err(bind_error)?;
        let addr = listener.local_addr().map_err(bind_error)?;

        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(config.worker_threads.max(1))
            .thread_name(SERVER_THREAD_NAME)
            .enable_all()
            .build()
            .map_err(MockHostError::Runtime)?;
        let listener = {
            let _guard = runtime.enter();
            tokio::net::TcpListener::from_std(listener).map_err(bind_error)?
        };

        let (shutdown_tx, shutdown_rx) = oneshot::channel();
        let thread = thread::Builder::new()
            .name(SERVER_THREAD_NAME.to_string())
            .spawn(move || serve(runtime, listener, app, shutdown_rx))
            .map_err(MockHostError::Runtime)?;

        Ok(Self {
            addr,
            shutdown: Some(shutdown_tx),
            thread: Some(thread),
        })
    }

    /// Address the server is bound to.
    pub(crate) fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Stops the server and waits for its thread. Returns `false` if it was already stopped.
    ///
    /// In-flight requests are dropped, delayed ones included; this never
    /// waits for a pending delay to elapse.
    pub(crate) fn stop(&mut self) -> bool {
        let Some(shutdown) = self.shutdown.take() else {
            return false;
        };
        // The receiver is gone only if the serve loop already exited on its own
        let _ = shutdown.send(());
        if let Some(thread) = self.thread.take() {
            if thread.join().is_err() {
                log::error!("mock server thread on {} panicked", self.addr);
            }
        }
        true
    }
}

fn serve(
    runtime: Runtime,
    listener: tokio::net::TcpListener,
    app: Router,
    shutdown: oneshot::Receiver<()>,
) {
    runtime.block_on(async move {
        tokio::select! {
            result = axum::serve(listener, app).into_future() => {
                if let Err(e) = result {
                    log::error!("mock server stopped unexpectedly: {}", e);
                }
            }
            _ = shutdown => {
                log::debug!("mock server received shutdown signal");
            }
        }
    });
    // Dropping the runtime cancels every connection task at its next await point
    drop(runtime);
}
