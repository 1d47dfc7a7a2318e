use std::sync::Arc;

use async_trait::async_trait;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use treksafer_router::Router;

/// A configured inbound channel: bind/subscribe, then run until the process
/// asks it to stop. The closed set matches `TransportConfig`'s variants.
#[async_trait]
pub trait Transport: Send {
    async fn run(self: Box<Self>, shutdown: tokio::sync::watch::Receiver<bool>) -> anyhow::Result<()>;
    fn name(&self) -> &'static str;
}

/// One request per connection: read up to 4 KiB, strip trailing whitespace,
/// route it, write the reply followed by a newline, close.
pub struct SocketTransport {
    pub host: String,
    pub port: u16,
    pub router: Arc<Router>,
}

#[async_trait]
impl Transport for SocketTransport {
    fn name(&self) -> &'static str {
        "cli"
    }

    async fn run(self: Box<Self>, mut shutdown: tokio::sync::watch::Receiver<bool>) -> anyhow::Result<()> {
        let addr = format!("{}:{}", self.host, self.port);
        let listener = TcpListener::bind(&addr).await?;
        tracing::info!(addr, "socket transport listening");

        loop {
            tokio::select! {
                accepted = listener.accept() => {
                    let (socket, peer) = accepted?;
                    let router = Arc::clone(&self.router);
                    tokio::spawn(async move {
                        if let Err(error) = handle_connection(socket, router).await {
                            tracing::warn!(%peer, %error, "socket connection failed");
                        }
                    });
                }
                _ = shutdown.changed() => {
                    tracing::info!("socket transport shutting down");
                    return Ok(());
                }
            }
        }
    }
}

async fn handle_connection(mut socket: tokio::net::TcpStream, router: Arc<Router>) -> anyhow::Result<()> {
    let mut buf = [0u8; 4096];
    let n = socket.read(&mut buf).await?;
    let message = String::from_utf8_lossy(&buf[..n]);
    let message = message.trim_end();

    let reply = router.handle(message).await;

    socket.write_all(reply.as_bytes()).await?;
    socket.write_all(b"\n").await?;
    socket.shutdown().await?;
    Ok(())
}

/// One inbound SMS event: the sender's number and the message text.
#[derive(Debug, Clone)]
pub struct InboundSms {
    pub from_number: String,
    pub body: String,
}

/// The external gateway boundary. No real provider SDK is vendored here, so
/// a concrete client (real or fake) plugs in behind this trait.
#[async_trait]
pub trait SmsGateway: Send + Sync {
    async fn next_message(&self) -> Option<InboundSms>;
    async fn send(&self, to_number: &str, body: &str) -> anyhow::Result<()>;
}

/// A long-running client-subscriber task: pull one inbound event at a time
/// from the gateway, route it, and send the reply back through the same
/// client. Every send/failure is appended to `logs/sms.log`.
pub struct SmsTransport {
    pub gateway: Arc<dyn SmsGateway>,
    pub router: Arc<Router>,
    pub sms_log: std::path::PathBuf,
}

#[async_trait]
impl Transport for SmsTransport {
    fn name(&self) -> &'static str {
        "sms"
    }

    async fn run(self: Box<Self>, mut shutdown: tokio::sync::watch::Receiver<bool>) -> anyhow::Result<()> {
        loop {
            tokio::select! {
                next = self.gateway.next_message() => {
                    let Some(event) = next else {
                        tracing::warn!("sms gateway subscription ended");
                        return Ok(());
                    };
                    self.handle_event(event).await;
                }
                _ = shutdown.changed() => {
                    tracing::info!("sms transport shutting down");
                    return Ok(());
                }
            }
        }
    }
}

impl SmsTransport {
    async fn handle_event(&self, event: InboundSms) {
        let reply = self.router.handle(&event.body).await;

        let outcome = match self.gateway.send(&event.from_number, &reply).await {
            Ok(()) => "sent",
            Err(error) => {
                tracing::warn!(from = event.from_number, %error, "failed to send sms reply");
                "failed"
            }
        };

        self.append_log(&event, &reply, outcome).await;
    }

    async fn append_log(&self, event: &InboundSms, reply: &str, outcome: &str) {
        use tokio::io::AsyncWriteExt;

        let Some(parent) = self.sms_log.parent() else { return };
        if tokio::fs::create_dir_all(parent).await.is_err() {
            return;
        }

        let line = format!("[{outcome}] from={} body={:?} reply={:?}\n", event.from_number, event.body, reply);
        if let Ok(mut file) = tokio::fs::OpenOptions::new().create(true).append(true).open(&self.sms_log).await {
            let _ = file.write_all(line.as_bytes()).await;
        }
    }
}
