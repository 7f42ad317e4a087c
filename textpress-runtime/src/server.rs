use crate::error::RuntimeError;
use crate::messages::ClientMessage;
use futures_util::{SinkExt, StreamExt};
use serde_json::json;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::{Mutex as TokioMutex, mpsc};
use tokio_tungstenite::tungstenite::Message;
use tracing::{debug, error, info};

pub struct ServerConfig {
    pub address: String,
}

pub async fn run_server(config: ServerConfig) -> Result<(), RuntimeError> {
    let addr = config.address.parse::<SocketAddr>().map_err(|_| {
        std::io::Error::new(std::io::ErrorKind::InvalidInput, "Invalid server address")
    })?;

    let listener = TcpListener::bind(&addr).await?;
    info!("WebSocket server listening on: {}", addr);

    let active_connections = Arc::new(TokioMutex::new(0));

    while let Ok((stream, peer_addr)) = listener.accept().await {
        info!("New connection from: {}", peer_addr);

        let connections = active_connections.clone();

        {
            let mut count = connections.lock().await;
            *count += 1;
            info!("Active connections: {}", *count);
        }

        tokio::spawn(async move {
            match handle_connection(stream, peer_addr).await {
                Ok(_) => info!("Connection from {} closed gracefully", peer_addr),
                Err(e) => error!("Error handling connection from {}: {}", peer_addr, e),
            }

            let mut count = connections.lock().await;
            *count -= 1;
            info!("Connection closed. Active connections: {}", *count);
        });
    }

    Ok(())
}

enum SenderMessage {
    Text(String),
    Pong(Vec<u8>),
    Close,
}

async fn handle_connection(stream: TcpStream, peer_addr: SocketAddr) -> Result<(), RuntimeError> {
    debug!("Starting WebSocket handshake with: {}", peer_addr);
    let ws_stream = tokio_tungstenite::accept_async(stream).await?;
    info!("WebSocket connection established with: {}", peer_addr);

    let (ws_sender, mut ws_receiver) = ws_stream.split();

    let (sender_tx, mut sender_rx) = mpsc::channel::<SenderMessage>(100);

    let sender_task = tokio::spawn(async move {
        let mut sender = ws_sender;

        while let Some(msg) = sender_rx.recv().await {
            match msg {
                SenderMessage::Text(text) => {
                    if let Err(e) = sender.send(Message::Text(text)).await {
                        error!("Error sending message: {}", e);
                        break;
                    }
                }
                SenderMessage::Pong(data) => {
                    if let Err(e) = sender.send(Message::Pong(data)).await {
                        error!("Error sending pong: {}", e);
                        break;
                    }
                }
                SenderMessage::Close => {
                    break;
                }
            }
        }

        let _ = sender.close().await;
    });

    if let Err(e) = sender_tx
        .send(SenderMessage::Text(
            r#"{"type":"connection","status":"connected"}"#.to_string(),
        ))
        .await
    {
        error!("Failed to send welcome message: {}", e);
        return Err(RuntimeError::ConnectionError(
            "Failed to send welcome message".to_string(),
        ));
    }

    let mut task_set: tokio::task::JoinSet<()> = tokio::task::JoinSet::new();

    while let Some(msg) = ws_receiver.next().await {
        match msg {
            Ok(Message::Text(text)) => {
                debug!("Received text message from {}: {}", peer_addr, text);

                let sender_clone = sender_tx.clone();

                match serde_json::from_str::<ClientMessage>(&text) {
                    Ok(ClientMessage::Request(request)) => {
                        debug!("Processing request with ID: {}", request.id);
                        let req_id = request.id.clone();

                        task_set.spawn(async move {
                            match crate::handler::handle_request(request).await {
                                Ok(response) => {
                                    if let Err(e) =
                                        sender_clone.send(SenderMessage::Text(response)).await
                                    {
                                        error!("Failed to send response for {}: {}", req_id, e);
                                    }
                                }
                                Err(e) => {
                                    error!("Error processing request {}: {}", req_id, e);

                                    let error_response = json!({
                                        "id": req_id,
                                        "success": false,
                                        "error": format!("Internal error: {}", e),
                                        "elapsed_ms": 0
                                    })
                                    .to_string();

                                    if let Err(send_err) =
                                        sender_clone.send(SenderMessage::Text(error_response)).await
                                    {
                                        error!("Failed to send error response: {}", send_err);
                                    }
                                }
                            }
                        });
                    }
                    Ok(ClientMessage::Unknown(value)) => {
                        error!("Received unknown message type: {}", value);

                        let error_msg = json!({
                            "error": "Unknown message format",
                            "details": value
                        })
                        .to_string();

                        if let Err(e) = sender_clone.send(SenderMessage::Text(error_msg)).await {
                            error!("Failed to send error message: {}", e);
                        }
                    }
                    Err(e) => {
                        error!("Failed to parse message: {}", e);

                        let error_msg = json!({
                            "error": "Failed to parse message",
                            "details": e.to_string()
                        })
                        .to_string();

                        if let Err(e) = sender_clone.send(SenderMessage::Text(error_msg)).await {
                            error!("Failed to send error message: {}", e);
                        }
                    }
                }
            }
            Ok(Message::Ping(data)) => {
                debug!("Received ping from {}", peer_addr);
                let pong_sender = sender_tx.clone();

                if let Err(e) = pong_sender.send(SenderMessage::Pong(data)).await {
                    error!("Error sending pong to {}: {}", peer_addr, e);
                }
            }
            Ok(Message::Close(_)) => {
                info!("Received close message from {}", peer_addr);
                break;
            }
            Err(e) => {
                error!("Error reading message from {}: {}", peer_addr, e);
                break;
            }
            _ => {
                debug!("Received other message type from {}", peer_addr);
            }
        }
    }

    let _ = sender_tx.send(SenderMessage::Close).await;

    if let Err(e) = sender_task.await {
        error!("Error awaiting sender task: {}", e);
    }

    debug!("Cleaning up tasks for connection {}", peer_addr);
    while task_set.join_next().await.is_some() {}

    info!("Closing connection with: {}", peer_addr);
    Ok(())
}
