use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::member::Voice;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RehearsalKind {
    General,
    #[serde(rename = "seccional")]
    Sectional,
    #[serde(rename = "otra_actividad")]
    OtherActivity,
}

impl RehearsalKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            RehearsalKind::General => "general",
            RehearsalKind::Sectional => "seccional",
            RehearsalKind::OtherActivity => "otra_actividad",
        }
    }
}

impl std::fmt::Display for RehearsalKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RehearsalKind::General => write!(f, "Ensayo general"),
            RehearsalKind::Sectional => write!(f, "Ensayo seccional"),
            RehearsalKind::OtherActivity => write!(f, "Otra actividad"),
        }
    }
}

/// A scheduled rehearsal. Older API builds label the name/time fields
/// `titulo`/`horaInicio` in list rows, so both are accepted on read.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Rehearsal {
    pub id: String,
    #[serde(rename = "nombre", alias = "titulo", default)]
    pub name: Option<String>,
    #[serde(rename = "fecha")]
    pub date: NaiveDate,
    /// Start time as "HH:MM"; kept as text because the API never sends seconds.
    #[serde(rename = "hora", alias = "horaInicio")]
    pub time: String,
    #[serde(rename = "lugar")]
    pub location: String,
    #[serde(rename = "tipo")]
    pub kind: RehearsalKind,
    /// Voice parts called for a sectional; absent for general rehearsals.
    #[serde(rename = "cuerdas", default)]
    pub sections: Option<Vec<Voice>>,
    #[serde(rename = "descripcion", default)]
    pub description: Option<String>,
    #[serde(rename = "created_by", default)]
    pub created_by: Option<String>,
    #[serde(rename = "created_at", default)]
    pub created_at: Option<String>,
    #[serde(rename = "updated_at", default)]
    pub updated_at: Option<String>,
}

impl Rehearsal {
    /// Name to show in lists, falling back to the kind label.
    pub fn display_name(&self) -> String {
        match &self.name {
            Some(name) if !name.is_empty() => name.clone(),
            _ => self.kind.to_string(),
        }
    }

    pub fn formatted_date(&self) -> String {
        self.date.format("%d/%m/%Y").to_string()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct NewRehearsal {
    #[serde(rename = "tipo")]
    pub kind: RehearsalKind,
    #[serde(rename = "nombre", skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "fecha")]
    pub date: NaiveDate,
    #[serde(rename = "hora")]
    pub time: String,
    #[serde(rename = "lugar")]
    pub location: String,
    #[serde(rename = "cuerdas", skip_serializing_if = "Option::is_none")]
    pub sections: Option<Vec<Voice>>,
    #[serde(rename = "descripcion", skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct RehearsalUpdate {
    #[serde(rename = "nombre", skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "fecha", skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,
    #[serde(rename = "hora", skip_serializing_if = "Option::is_none")]
    pub time: Option<String>,
    #[serde(rename = "lugar", skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(rename = "tipo", skip_serializing_if = "Option::is_none")]
    pub kind: Option<RehearsalKind>,
    #[serde(rename = "cuerdas", skip_serializing_if = "Option::is_none")]
    pub sections: Option<Vec<Voice>>,
    #[serde(rename = "descripcion", skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Paged rehearsal listing from the admin endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct RehearsalList {
    pub rehearsals: Vec<Rehearsal>,
    pub total: u64,
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_rehearsal_with_legacy_field_names() {
        let json = r#"{
            "id": "r-3",
            "titulo": "Ensayo de cuerda grave",
            "fecha": "2026-09-01",
            "horaInicio": "19:30",
            "lugar": "Sala 2",
            "tipo": "seccional",
            "cuerdas": ["bajo1", "bajo2"]
        }"#;

        let rehearsal: Rehearsal = serde_json::from_str(json).unwrap();
        assert_eq!(rehearsal.display_name(), "Ensayo de cuerda grave");
        assert_eq!(rehearsal.time, "19:30");
        assert_eq!(
            rehearsal.sections,
            Some(vec![Voice::Bass1, Voice::Bass2])
        );
        assert_eq!(rehearsal.formatted_date(), "01/09/2026");
    }

    #[test]
    fn display_name_falls_back_to_kind() {
        let json = r#"{
            "id": "r-4",
            "fecha": "2026-09-08",
            "hora": "20:00",
            "lugar": "Auditorio",
            "tipo": "general"
        }"#;

        let rehearsal: Rehearsal = serde_json::from_str(json).unwrap();
        assert_eq!(rehearsal.display_name(), "Ensayo general");
    }
}
