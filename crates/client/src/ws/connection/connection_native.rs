//! Native WebSocket transport using tokio-tungstenite.

use async_trait::async_trait;
use futures_channel::mpsc::unbounded;
use futures_util::{SinkExt, StreamExt};
use tokio_tungstenite::{connect_async, tungstenite::Message};

use super::{Connector, TransportError, TransportLink};

/// Opens real WebSocket connections.
///
/// Each open socket gets a read pump and a write pump, bridged to the
/// returned [`TransportLink`]. Dropping the link ends both pumps and closes
/// the socket.
#[derive(Debug, Clone, Default)]
pub struct TungsteniteConnector;

#[async_trait]
impl Connector for TungsteniteConnector {
    async fn connect(&self, url: &str) -> Result<TransportLink, TransportError> {
        let (ws_stream, _response) = connect_async(url).await?;
        crate::log_info!("WebSocket connected to {}", url);

        let (mut write, mut read) = ws_stream.split();
        let (inbound_tx, inbound_rx) = unbounded::<String>();
        let (outbound_tx, mut outbound_rx) = unbounded::<String>();

        // Read pump
        let url_for_read = url.to_string();
        tokio::spawn(async move {
            while let Some(msg_result) = read.next().await {
                match msg_result {
                    Ok(Message::Text(text)) => {
                        if inbound_tx.unbounded_send(text.as_str().to_owned()).is_err() {
                            // Link dropped
                            break;
                        }
                    }
                    Ok(Message::Close(_)) => {
                        crate::log_info!("WebSocket to {} received close frame", url_for_read);
                        break;
                    }
                    Ok(Message::Ping(data)) => {
                        // Pong is handled automatically by tungstenite
                        crate::log_debug!("Received ping: {:?}", data);
                    }
                    Ok(_) => {
                        // Ignore binary, pong, etc.
                    }
                    Err(e) => {
                        crate::log_error!("WebSocket read error: {}", e);
                        break;
                    }
                }
            }
            // dropping inbound_tx tells the manager the peer is gone
        });

        // Write pump
        let url_for_write = url.to_string();
        tokio::spawn(async move {
            while let Some(text) = outbound_rx.next().await {
                if let Err(e) = write.send(Message::Text(text.into())).await {
                    crate::log_error!("Send to {} failed: {}", url_for_write, e);
                    return;
                }
            }
            crate::log_debug!("Link to {} dropped, closing socket", url_for_write);
            let _ = write.send(Message::Close(None)).await;
            let _ = write.close().await;
        });

        Ok(TransportLink::new(outbound_tx, inbound_rx))
    }
}
