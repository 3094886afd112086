use std::sync::Arc;

use tokio::net::TcpListener;
use tracing::info;

use crate::config::Config;
use crate::http::connection::Connection;
use crate::server::ServeContext;

pub async fn run(cfg: &Config) -> anyhow::Result<()> {
    let ctx = Arc::new(ServeContext::from_config(cfg)?);
    let listener = TcpListener::bind(&cfg.server.listen_addr).await?;
    info!(
        root = %ctx.root.path().display(),
        "Listening on {}",
        cfg.server.listen_addr
    );

    serve(listener, ctx).await
}

/// Accepts connections forever, one task per connection.
pub async fn serve(listener: TcpListener, ctx: Arc<ServeContext>) -> anyhow::Result<()> {
    loop {
        let (socket, peer) = listener.accept().await?;
        info!("Accepted connection from {}", peer);

        let ctx = ctx.clone();
        tokio::spawn(async move {
            let mut conn = Connection::new(socket, ctx);
            if let Err(e) = conn.run().await {
                tracing::debug!("Connection to {} aborted: {}", peer, e);
            }
        });
    }
}
