//! Status stream subscription.

use futures_util::StreamExt;
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};

use super::ClientError;
use crate::objects::ws::WsServerMessage;

/// An open status stream for one checkout session.
///
/// Dropping or [closing](SessionWatcher::close) the watcher tells the
/// server the customer left the checkout, which closes the session.
pub struct SessionWatcher {
    stream: WebSocketStream<MaybeTlsStream<TcpStream>>,
}

impl SessionWatcher {
    pub(super) async fn connect(url: &str) -> Result<Self, ClientError> {
        let (stream, _response) = connect_async(url).await?;
        Ok(Self { stream })
    }

    /// Wait for the next server message.
    ///
    /// Returns `None` once the server has closed the stream.
    pub async fn next(&mut self) -> Option<Result<WsServerMessage, ClientError>> {
        while let Some(frame) = self.stream.next().await {
            match frame {
                Ok(Message::Text(text)) => {
                    return Some(serde_json::from_str(&text).map_err(ClientError::Json));
                }
                Ok(Message::Close(_)) => return None,
                Ok(_) => continue,
                Err(e) => return Some(Err(e.into())),
            }
        }
        None
    }

    /// Close the stream and with it the checkout session.
    pub async fn close(mut self) -> Result<(), ClientError> {
        self.stream.close(None).await?;
        Ok(())
    }
}
