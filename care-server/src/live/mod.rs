//! EventHub: 实时事件分发
//!
//! 所有服务端事件经由一个 broadcast 通道扇出，每个订阅者按 [`Audience`] 过滤。
//!
//! ```text
//! handlers / reminder scanner
//!       │ publish(Audience, ServerEvent)
//!       ▼
//! EventHub (broadcast::Sender<Arc<LiveEvent>>)
//!       │
//!       ▼
//! Subscription (每个 WS 连接一个: user_id + 已加入的 room)
//!       │ accepts() 过滤
//!       ▼
//! WebSocket frame {"event", "data"}
//! ```
//!
//! 不做持久化：发布之后才订阅的连接收不到该事件。

use std::collections::HashSet;
use std::sync::Arc;

use dashmap::DashMap;
use shared::ServerEvent;
use tokio::sync::broadcast;
use tokio::sync::broadcast::error::RecvError;

/// 事件的投递范围
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Audience {
    /// 所有已认证连接 (紧急报警)
    Everyone,
    /// 指定用户 (提醒、任务更新)
    Users(Vec<String>),
    /// 加入了该聊天室的连接
    Room(String),
}

/// Hub 内部事件
#[derive(Debug, Clone)]
pub struct LiveEvent {
    pub audience: Audience,
    pub event: ServerEvent,
}

/// Process-wide publish/subscribe hub, owned by `ServerState`
#[derive(Clone)]
pub struct EventHub {
    tx: broadcast::Sender<Arc<LiveEvent>>,
    /// user_id → 当前连接数
    connections: Arc<DashMap<String, usize>>,
}

impl EventHub {
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity.max(1));
        Self {
            tx,
            connections: Arc::new(DashMap::new()),
        }
    }

    /// Fire-and-forget publish
    ///
    /// Returns how many subscribers were handed the event before filtering;
    /// 0 when nobody is connected.
    pub fn publish(&self, audience: Audience, event: ServerEvent) -> usize {
        let name = event.name();
        match self.tx.send(Arc::new(LiveEvent { audience, event })) {
            Ok(n) => {
                tracing::debug!(event = name, receivers = n, "Live event published");
                n
            }
            // 无订阅者时 send 返回 Err，安全忽略
            Err(_) => 0,
        }
    }

    pub fn to_everyone(&self, event: ServerEvent) -> usize {
        self.publish(Audience::Everyone, event)
    }

    pub fn to_users(&self, users: Vec<String>, event: ServerEvent) -> usize {
        self.publish(Audience::Users(users), event)
    }

    pub fn to_room(&self, room: impl Into<String>, event: ServerEvent) -> usize {
        self.publish(Audience::Room(room.into()), event)
    }

    /// Register a new subscriber for `user_id`
    pub fn subscribe(&self, user_id: impl Into<String>) -> Subscription {
        let user_id = user_id.into();
        *self.connections.entry(user_id.clone()).or_insert(0) += 1;
        Subscription {
            user_id,
            rooms: HashSet::new(),
            rx: self.tx.subscribe(),
            connections: self.connections.clone(),
        }
    }

    /// Whether the user has at least one live connection
    pub fn is_online(&self, user_id: &str) -> bool {
        self.connections.contains_key(user_id)
    }

    /// Number of distinct connected users
    pub fn online_users(&self) -> usize {
        self.connections.len()
    }

    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

/// One connected client: its identity, joined rooms and receiver
pub struct Subscription {
    user_id: String,
    rooms: HashSet<String>,
    rx: broadcast::Receiver<Arc<LiveEvent>>,
    connections: Arc<DashMap<String, usize>>,
}

impl Subscription {
    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    /// Caller must have checked room participation
    pub fn join_room(&mut self, room: impl Into<String>) -> bool {
        self.rooms.insert(room.into())
    }

    pub fn leave_room(&mut self, room: &str) -> bool {
        self.rooms.remove(room)
    }

    pub fn in_room(&self, room: &str) -> bool {
        self.rooms.contains(room)
    }

    /// Delivery filter
    pub fn accepts(&self, event: &LiveEvent) -> bool {
        match &event.audience {
            Audience::Everyone => true,
            Audience::Users(users) => users.iter().any(|u| u == &self.user_id),
            Audience::Room(room) => self.rooms.contains(room),
        }
    }

    /// Next event addressed to this subscriber
    ///
    /// Lagged receivers drop the missed events and keep going.
    /// Returns `None` once the hub is gone.
    pub async fn recv(&mut self) -> Option<ServerEvent> {
        loop {
            match self.rx.recv().await {
                Ok(event) => {
                    if self.accepts(&event) {
                        return Some(event.event.clone());
                    }
                }
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!(
                        user_id = %self.user_id,
                        skipped,
                        "Live subscriber lagged, events dropped"
                    );
                }
                Err(RecvError::Closed) => return None,
            }
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        let gone = match self.connections.get_mut(&self.user_id) {
            Some(mut count) => {
                *count = count.saturating_sub(1);
                *count == 0
            }
            None => false,
        };
        if gone {
            self.connections.remove_if(&self.user_id, |_, count| *count == 0);
        }
    }
}
