use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Label shown when there is no known sync time.
pub const NO_CACHE_LABEL: &str = "Sem cache";

/// Result of the latest connectivity probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectivityState {
    pub is_online: bool,
}

impl ConnectivityState {
    pub fn new(is_online: bool) -> Self {
        Self { is_online }
    }

    pub fn is_offline_mode(&self) -> bool {
        !self.is_online
    }
}

/// What a single probe changed, relative to the previous one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    StillOnline,
    StillOffline,
    Reconnected,
    Disconnected,
}

impl Transition {
    pub fn between(was_online: bool, is_online: bool) -> Self {
        match (was_online, is_online) {
            (true, true) => Transition::StillOnline,
            (false, false) => Transition::StillOffline,
            (false, true) => Transition::Reconnected,
            (true, false) => Transition::Disconnected,
        }
    }

    pub fn is_online(self) -> bool {
        matches!(self, Transition::StillOnline | Transition::Reconnected)
    }
}

/// Published once per offline -> online transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Reconnected {
    pub at: DateTime<Utc>,
}

/// Status object handed to the UI layer. Recomputed on every read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SyncStatus {
    pub is_online: bool,
    pub is_offline_mode: bool,
    pub last_sync_time: Option<DateTime<Utc>>,
    pub cache_age: String,
}

impl SyncStatus {
    pub fn new(is_online: bool, last_sync_time: Option<DateTime<Utc>>, now: DateTime<Utc>) -> Self {
        Self {
            is_online,
            is_offline_mode: !is_online,
            last_sync_time,
            cache_age: describe_cache_age(last_sync_time, now),
        }
    }
}

/// Coarse relative age of the last sync: "Agora", "N min atrás", "Nh atrás", "Nd atrás".
pub fn describe_cache_age(last_sync: Option<DateTime<Utc>>, now: DateTime<Utc>) -> String {
    let Some(last_sync) = last_sync else {
        return NO_CACHE_LABEL.to_string();
    };

    let elapsed = now - last_sync;
    let minutes = elapsed.num_minutes();
    let hours = elapsed.num_hours();
    let days = elapsed.num_days();

    if minutes < 1 {
        "Agora".to_string()
    } else if minutes < 60 {
        format!("{} min atrás", minutes)
    } else if hours < 24 {
        format!("{}h atrás", hours)
    } else {
        format!("{}d atrás", days)
    }
}

// 查询源枚举
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum QuerySource {
    Network,
    Cache,
}

/// Payload returned by the query layer, tagged with where it came from.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryResult {
    pub name: String,
    pub data: serde_json::Value,
    pub source: QuerySource,
    pub fetched_at: DateTime<Utc>,
}
