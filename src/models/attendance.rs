use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// One attendance row as the member sees it, joined with the rehearsal
/// it belongs to.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttendanceRecord {
    pub id: String,
    #[serde(rename = "ensayo_id")]
    pub rehearsal_id: String,
    #[serde(rename = "ensayo_nombre", default)]
    pub rehearsal_name: Option<String>,
    #[serde(rename = "ensayo_fecha", default)]
    pub rehearsal_date: Option<NaiveDate>,
    #[serde(rename = "presente")]
    pub present: bool,
    #[serde(rename = "justificacion", default)]
    pub justification: Option<String>,
    #[serde(rename = "registrado_en", default)]
    pub recorded_at: Option<DateTime<Utc>>,
}

/// One attendance row as stored against a rehearsal roster.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttendanceEntry {
    pub id: String,
    #[serde(rename = "miembro_id")]
    pub member_id: String,
    #[serde(rename = "ensayo_id")]
    pub rehearsal_id: String,
    #[serde(rename = "presente")]
    pub present: bool,
    #[serde(rename = "justificacion", default)]
    pub justification: Option<String>,
    #[serde(rename = "registrado_por", default)]
    pub recorded_by: Option<String>,
    #[serde(rename = "registrado_en", default)]
    pub recorded_at: Option<DateTime<Utc>>,
}

/// Per-member attendance totals. Older API builds shipped shorter field
/// names, accepted here as aliases.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttendanceStats {
    #[serde(rename = "total_ensayos", alias = "total")]
    pub total_rehearsals: u32,
    #[serde(rename = "asistencias", alias = "presentes")]
    pub attended: u32,
    #[serde(rename = "inasistencias", alias = "ausentes")]
    pub missed: u32,
    #[serde(rename = "porcentaje")]
    pub percentage: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AttendanceReportRecord {
    pub id: String,
    #[serde(rename = "miembro_id")]
    pub member_id: String,
    #[serde(rename = "miembro_nombre", default)]
    pub member_name: Option<String>,
    #[serde(rename = "ensayo_id")]
    pub rehearsal_id: String,
    #[serde(rename = "ensayo_nombre", default)]
    pub rehearsal_name: Option<String>,
    #[serde(rename = "presente")]
    pub present: bool,
    #[serde(rename = "justificacion", default)]
    pub justification: Option<String>,
    #[serde(rename = "registrado_en", default)]
    pub recorded_at: Option<DateTime<Utc>>,
}

/// Aggregate attendance report over a date range.
#[derive(Debug, Clone, Deserialize)]
pub struct AttendanceReport {
    pub total: u64,
    #[serde(rename = "presentes")]
    pub present: u64,
    #[serde(rename = "ausentes")]
    pub absent: u64,
    #[serde(rename = "porcentaje_presencia")]
    pub presence_percentage: f64,
    pub records: Vec<AttendanceReportRecord>,
}

/// Body for recording one member's attendance against a rehearsal.
#[derive(Debug, Clone, Serialize)]
pub struct NewAttendance {
    #[serde(rename = "miembro_id")]
    pub member_id: String,
    #[serde(rename = "presente")]
    pub present: bool,
    #[serde(rename = "justificacion", skip_serializing_if = "Option::is_none")]
    pub justification: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct AttendanceUpdate {
    #[serde(rename = "presente", skip_serializing_if = "Option::is_none")]
    pub present: Option<bool>,
    #[serde(rename = "justificacion", skip_serializing_if = "Option::is_none")]
    pub justification: Option<String>,
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_stats_with_current_and_legacy_names() {
        let current = r#"{"total_ensayos": 12, "asistencias": 10, "inasistencias": 2, "porcentaje": 83.3}"#;
        let legacy = r#"{"total": 12, "presentes": 10, "ausentes": 2, "porcentaje": 83.3}"#;

        let a: AttendanceStats = serde_json::from_str(current).unwrap();
        let b: AttendanceStats = serde_json::from_str(legacy).unwrap();

        assert_eq!(a.total_rehearsals, b.total_rehearsals);
        assert_eq!(a.attended, 10);
        assert_eq!(b.missed, 2);
    }

    #[test]
    fn new_attendance_omits_missing_justification() {
        let body = NewAttendance {
            member_id: "m-1".to_string(),
            present: true,
            justification: None,
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["miembro_id"], "m-1");
        assert_eq!(json["presente"], true);
        assert!(json.get("justificacion").is_none());
    }
}
