//! 类型转换模块
//!
//! 将数据库模型 (db::models) 转换为 API 响应模型 (shared::models)

use crate::db::models as db;
use shared::models as api;

// ============ Helper ============

pub fn option_record_to_string(id: &Option<surrealdb::RecordId>) -> Option<String> {
    id.as_ref().map(|i| i.to_string())
}

/// Vec<db::X> → Vec<api::X>
pub fn convert_all<D, A: From<D>>(items: Vec<D>) -> Vec<A> {
    items.into_iter().map(A::from).collect()
}

// ============ User ============

impl From<db::User> for api::User {
    fn from(u: db::User) -> Self {
        Self {
            id: option_record_to_string(&u.id),
            email: u.email,
            first_name: u.first_name,
            last_name: u.last_name,
            role: u.role,
            phone_number: u.phone_number,
            address: u.address,
            language: u.language,
            latitude: u.latitude,
            longitude: u.longitude,
            created_at: u.created_at,
        }
    }
}

// ============ Task ============

impl From<db::Task> for api::Task {
    fn from(t: db::Task) -> Self {
        Self {
            id: option_record_to_string(&t.id),
            title: t.title,
            description: t.description,
            scheduled_at: t.scheduled_at,
            reminder_at: t.reminder_at,
            status: t.status,
            created_by: t.created_by,
            assigned_to: t.assigned_to,
            created_at: t.created_at,
            updated_at: t.updated_at,
        }
    }
}

// ============ Emergency ============

impl From<db::EmergencyAlert> for api::EmergencyAlert {
    fn from(a: db::EmergencyAlert) -> Self {
        Self {
            id: option_record_to_string(&a.id),
            triggered_by: a.triggered_by,
            latitude: a.latitude,
            longitude: a.longitude,
            message: a.message,
            acknowledged: a.acknowledged,
            acknowledged_by: a.acknowledged_by,
            created_at: a.created_at,
        }
    }
}

// ============ Chat ============

impl From<db::ChatRoom> for api::ChatRoom {
    fn from(r: db::ChatRoom) -> Self {
        Self {
            id: option_record_to_string(&r.id),
            participants: r.participants,
            name: r.name,
            is_group_chat: r.is_group_chat,
            created_by: r.created_by,
            created_at: r.created_at,
        }
    }
}

impl From<db::ChatMessage> for api::ChatMessage {
    fn from(m: db::ChatMessage) -> Self {
        Self {
            id: option_record_to_string(&m.id),
            room: m.room,
            sender: m.sender,
            message: m.message,
            created_at: m.created_at,
        }
    }
}

// ============ Prescription ============

impl From<db::Prescription> for api::Prescription {
    fn from(p: db::Prescription) -> Self {
        Self {
            id: option_record_to_string(&p.id),
            user: p.user,
            prescribed_by: p.prescribed_by,
            medication_name: p.medication_name,
            dosage: p.dosage,
            frequency: p.frequency,
            start_date: p.start_date,
            end_date: p.end_date,
            notes: p.notes,
            created_at: p.created_at,
        }
    }
}

// ============ Grocery ============

impl From<db::GroceryOrder> for api::GroceryOrder {
    fn from(o: db::GroceryOrder) -> Self {
        Self {
            id: option_record_to_string(&o.id),
            user: o.user,
            assigned_to: o.assigned_to,
            items: o.items,
            status: o.status,
            created_at: o.created_at,
            updated_at: o.updated_at,
        }
    }
}

// ============ Forum ============

/// 评论由 handler 另行填充
impl From<db::ForumPost> for api::ForumPost {
    fn from(p: db::ForumPost) -> Self {
        Self {
            id: option_record_to_string(&p.id),
            author: p.author,
            title: p.title,
            content: p.content,
            comments: Vec::new(),
            created_at: p.created_at,
            updated_at: p.updated_at,
        }
    }
}

impl From<db::ForumComment> for api::ForumComment {
    fn from(c: db::ForumComment) -> Self {
        Self {
            id: option_record_to_string(&c.id),
            post: c.post,
            author: c.author,
            content: c.content,
            created_at: c.created_at,
        }
    }
}

// ============ Health / Check-in ============

impl From<db::HealthLog> for api::HealthLog {
    fn from(l: db::HealthLog) -> Self {
        Self {
            id: option_record_to_string(&l.id),
            user: l.user,
            date: l.date,
            steps: l.steps,
            sleep_hours: l.sleep_hours,
            physical_activity: l.physical_activity,
            created_at: l.created_at,
            updated_at: l.updated_at,
        }
    }
}

impl From<db::CheckIn> for api::CheckIn {
    fn from(c: db::CheckIn) -> Self {
        Self {
            id: option_record_to_string(&c.id),
            user: c.user,
            latitude: c.latitude,
            longitude: c.longitude,
            check_in_time: c.check_in_time,
        }
    }
}

// ============ Rating / Voice ============

impl From<db::Rating> for api::Rating {
    fn from(r: db::Rating) -> Self {
        Self {
            id: option_record_to_string(&r.id),
            rater: r.rater,
            rated_user: r.rated_user,
            value: r.value,
            comment: r.comment,
            created_at: r.created_at,
        }
    }
}

impl From<db::VoiceCommand> for api::VoiceCommand {
    fn from(v: db::VoiceCommand) -> Self {
        Self {
            id: option_record_to_string(&v.id),
            user: v.user,
            command_text: v.command_text,
            created_at: v.created_at,
        }
    }
}
