use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventKind {
    #[serde(rename = "concierto")]
    Concert,
    #[serde(rename = "actividad")]
    Activity,
    #[serde(rename = "otro")]
    Other,
}

impl EventKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::Concert => "concierto",
            EventKind::Activity => "actividad",
            EventKind::Other => "otro",
        }
    }
}

impl std::fmt::Display for EventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EventKind::Concert => write!(f, "Concierto"),
            EventKind::Activity => write!(f, "Actividad"),
            EventKind::Other => write!(f, "Otro"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventStatus {
    #[serde(rename = "planificado")]
    Planned,
    #[serde(rename = "en_curso")]
    InProgress,
    #[serde(rename = "finalizado")]
    Finished,
    #[serde(rename = "cancelado")]
    Cancelled,
}

impl EventStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventStatus::Planned => "planificado",
            EventStatus::InProgress => "en_curso",
            EventStatus::Finished => "finalizado",
            EventStatus::Cancelled => "cancelado",
        }
    }
}

impl std::fmt::Display for EventStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EventStatus::Planned => write!(f, "Planificado"),
            EventStatus::InProgress => write!(f, "En curso"),
            EventStatus::Finished => write!(f, "Finalizado"),
            EventStatus::Cancelled => write!(f, "Cancelado"),
        }
    }
}

/// A public-facing choir event (concert or activity).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    pub id: String,
    #[serde(rename = "nombre")]
    pub name: String,
    #[serde(rename = "descripcion", default)]
    pub description: Option<String>,
    #[serde(rename = "fecha")]
    pub date: NaiveDate,
    /// Start time as "HH:MM".
    #[serde(rename = "hora")]
    pub time: String,
    #[serde(rename = "lugar")]
    pub location: String,
    #[serde(rename = "tipo")]
    pub kind: EventKind,
    #[serde(rename = "estado")]
    pub status: EventStatus,
    #[serde(rename = "imagen_url", default)]
    pub image_url: Option<String>,
    #[serde(rename = "created_by", default)]
    pub created_by: Option<String>,
    #[serde(rename = "created_at", default)]
    pub created_at: Option<String>,
    #[serde(rename = "updated_at", default)]
    pub updated_at: Option<String>,
}

impl Event {
    pub fn formatted_date(&self) -> String {
        self.date.format("%d/%m/%Y").to_string()
    }

    /// Still in the future (or today) and not cancelled.
    pub fn is_upcoming(&self) -> bool {
        self.status != EventStatus::Cancelled && self.date >= Local::now().date_naive()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct NewEvent {
    #[serde(rename = "nombre")]
    pub name: String,
    #[serde(rename = "descripcion", skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(rename = "fecha")]
    pub date: NaiveDate,
    #[serde(rename = "hora")]
    pub time: String,
    #[serde(rename = "lugar")]
    pub location: String,
    #[serde(rename = "tipo")]
    pub kind: EventKind,
    #[serde(rename = "imagen_url", skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct EventUpdate {
    #[serde(rename = "nombre", skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "descripcion", skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(rename = "fecha", skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,
    #[serde(rename = "hora", skip_serializing_if = "Option::is_none")]
    pub time: Option<String>,
    #[serde(rename = "lugar", skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(rename = "tipo", skip_serializing_if = "Option::is_none")]
    pub kind: Option<EventKind>,
    #[serde(rename = "estado", skip_serializing_if = "Option::is_none")]
    pub status: Option<EventStatus>,
    #[serde(rename = "imagen_url", skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

/// Paged event listing from the admin endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct EventList {
    pub events: Vec<Event>,
    pub total: u64,
}

// ============================================================================
// Tests
// ============================================================================
