//! Live WebSocket Handler
//!
//! 协议:
//! - Server → Client: `{"event": ..., "data": ...}` ([`ServerEvent`])
//! - Client → Server: `{"type": "joinRoom" | "leaveRoom" | "chatMessage", ...}` ([`ClientCommand`])

use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::{Query, State};
use axum::response::IntoResponse;
use futures::{SinkExt, StreamExt};
use serde::Deserialize;
use shared::{AppError, ClientCommand, ServerEvent};
use tokio::time::Duration;

use crate::api::chat::{load_room_for, post_message};
use crate::auth::{CurrentUser, authenticate};
use crate::core::ServerState;
use crate::db::repository::chat::ROOM_TABLE;
use crate::db::repository::qualified_id;
use crate::live::Subscription;

const PING_INTERVAL: Duration = Duration::from_secs(30);

#[derive(Deserialize)]
pub struct WsAuthQuery {
    token: Option<String>,
}

/// GET /api/live/ws?token=<JWT>
pub async fn live_ws(
    State(state): State<ServerState>,
    Query(query): Query<WsAuthQuery>,
    ws: WebSocketUpgrade,
) -> Result<impl IntoResponse, AppError> {
    let user = authenticate(&state.jwt_service, query.token.as_deref(), "/api/live/ws")?;

    Ok(ws.on_upgrade(move |socket| live_session(socket, state, user)))
}

async fn live_session(socket: WebSocket, state: ServerState, user: CurrentUser) {
    let (mut sink, mut stream) = socket.split();
    let mut subscription = state.hub.subscribe(user.id.clone());
    let shutdown = state.shutdown_token();

    tracing::info!(user_id = %user.id, "Live WS connected");

    let ready = ServerEvent::Ready {
        user_id: user.id.clone(),
    };
    if send_event(&mut sink, &ready).await.is_err() {
        return;
    }

    let mut ping_interval = tokio::time::interval(PING_INTERVAL);
    ping_interval.tick().await; // skip immediate

    loop {
        tokio::select! {
            _ = shutdown.cancelled() => {
                let _ = sink.send(Message::Close(None)).await;
                break;
            }

            _ = ping_interval.tick() => {
                if sink.send(Message::Ping(vec![].into())).await.is_err() {
                    break;
                }
            }

            event = subscription.recv() => {
                match event {
                    Some(event) => {
                        if send_event(&mut sink, &event).await.is_err() {
                            break;
                        }
                    }
                    None => break,
                }
            }

            msg = stream.next() => {
                match msg {
                    Some(Ok(Message::Text(text))) => {
                        let reply = match serde_json::from_str::<ClientCommand>(&text) {
                            Ok(cmd) => handle_command(&state, &mut subscription, cmd).await,
                            Err(e) => Some(ServerEvent::error(format!("Invalid command: {e}"))),
                        };
                        if let Some(reply) = reply
                            && send_event(&mut sink, &reply).await.is_err()
                        {
                            break;
                        }
                    }
                    Some(Ok(Message::Close(_))) | None => break,
                    Some(Err(_)) => break,
                    _ => {}
                }
            }
        }
    }

    tracing::info!(user_id = %user.id, "Live WS disconnected");
}

/// 处理客户端命令，返回需要回给该连接的事件 (错误)
pub async fn handle_command(
    state: &ServerState,
    subscription: &mut Subscription,
    cmd: ClientCommand,
) -> Option<ServerEvent> {
    let user_id = subscription.user_id().to_string();
    match cmd {
        ClientCommand::JoinRoom { room } => match load_room_for(state, &room, &user_id).await {
            Ok(_) => {
                // 与 chat_message.room 相同的 "chat_room:xxx" 形式
                let key = qualified_id(ROOM_TABLE, &room);
                tracing::debug!(user_id = %user_id, room = %key, "Joined chat room");
                subscription.join_room(key);
                None
            }
            Err(e) => Some(ServerEvent::error(e.message)),
        },
        ClientCommand::LeaveRoom { room } => {
            subscription.leave_room(&qualified_id(ROOM_TABLE, &room));
            None
        }
        ClientCommand::ChatMessage { room, message } => {
            // 广播会回到发送者自己 (若已加入房间)
            match post_message(state, &user_id, &room, &message).await {
                Ok(_) => None,
                Err(e) => Some(ServerEvent::error(e.message)),
            }
        }
    }
}

async fn send_event<S>(sink: &mut S, event: &ServerEvent) -> Result<(), ()>
where
    S: futures::Sink<Message, Error = axum::Error> + Unpin,
{
    let json = serde_json::to_string(event).map_err(|_| ())?;
    sink.send(Message::Text(json.into())).await.map_err(|_| ())
}
