use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Who a news item (comunicado) is addressed to. Public listings only
/// ever contain items addressed to `todos`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Audience {
    #[serde(rename = "todos")]
    All,
    #[serde(rename = "grupo")]
    Group,
    Individual,
}

impl Audience {
    pub fn as_str(&self) -> &'static str {
        match self {
            Audience::All => "todos",
            Audience::Group => "grupo",
            Audience::Individual => "individual",
        }
    }
}

/// A news item / announcement sent out by the choir.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewsItem {
    pub id: String,
    #[serde(rename = "titulo")]
    pub title: String,
    #[serde(rename = "contenido")]
    pub content: String,
    #[serde(rename = "dirigido_a", default)]
    pub audience: Option<Audience>,
    #[serde(rename = "grupo_destino", default)]
    pub target_group: Option<String>,
    #[serde(rename = "miembro_destino", default)]
    pub target_member: Option<String>,
    #[serde(rename = "programado_para", default)]
    pub scheduled_for: Option<DateTime<Utc>>,
    #[serde(rename = "enviado_por", default)]
    pub sent_by: Option<String>,
    #[serde(rename = "enviado_en", default)]
    pub sent_at: Option<DateTime<Utc>>,
    #[serde(rename = "created_at", default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// Static public page content served by slug (historia, mision, ...).
#[derive(Debug, Clone, Deserialize)]
pub struct Page {
    pub slug: String,
    pub title: String,
    pub content: String,
}

// ============================================================================
// Tests
// ============================================================================
