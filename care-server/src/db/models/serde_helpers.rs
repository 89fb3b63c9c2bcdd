//! `Option<RecordId>` 的 serde 适配
//!
//! 写出时为 "table:key" 字符串；读入时既接受字符串，
//! 也接受 SurrealDB 返回的原生 RecordId 结构。

use serde::{Deserialize, Deserializer, Serializer};
use surrealdb::RecordId;

#[derive(Deserialize)]
#[serde(untagged)]
enum AnyRecordId {
    Text(String),
    Native(RecordId),
}

impl AnyRecordId {
    fn into_record_id<E: serde::de::Error>(self) -> Result<RecordId, E> {
        match self {
            AnyRecordId::Native(id) => Ok(id),
            AnyRecordId::Text(raw) => raw
                .parse()
                .map_err(|_| E::custom(format!("expected 'table:key', got {raw:?}"))),
        }
    }
}

/// `#[serde(with = "serde_helpers::option_record_id")]`
pub mod option_record_id {
    use super::*;

    pub fn serialize<S: Serializer>(id: &Option<RecordId>, s: S) -> Result<S::Ok, S::Error> {
        match id {
            Some(id) => s.collect_str(id),
            None => s.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<RecordId>, D::Error> {
        Option::<AnyRecordId>::deserialize(d)?
            .map(AnyRecordId::into_record_id)
            .transpose()
    }
}
