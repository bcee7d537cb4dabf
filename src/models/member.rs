use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Voice part (cuerda) a member sings in, plus the two non-singing roles
/// the roster tracks alongside them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Voice {
    Soprano1,
    Soprano2,
    Contralto1,
    Contralto2,
    Tenor1,
    Tenor2,
    #[serde(rename = "bajo1")]
    Bass1,
    #[serde(rename = "bajo2")]
    Bass2,
    Director,
    #[serde(rename = "pianista")]
    Pianist,
}

impl Voice {
    pub const ALL: [Voice; 10] = [
        Voice::Soprano1,
        Voice::Soprano2,
        Voice::Contralto1,
        Voice::Contralto2,
        Voice::Tenor1,
        Voice::Tenor2,
        Voice::Bass1,
        Voice::Bass2,
        Voice::Director,
        Voice::Pianist,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Voice::Soprano1 => "soprano1",
            Voice::Soprano2 => "soprano2",
            Voice::Contralto1 => "contralto1",
            Voice::Contralto2 => "contralto2",
            Voice::Tenor1 => "tenor1",
            Voice::Tenor2 => "tenor2",
            Voice::Bass1 => "bajo1",
            Voice::Bass2 => "bajo2",
            Voice::Director => "director",
            Voice::Pianist => "pianista",
        }
    }
}

impl std::fmt::Display for Voice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Voice::Soprano1 => write!(f, "Soprano 1"),
            Voice::Soprano2 => write!(f, "Soprano 2"),
            Voice::Contralto1 => write!(f, "Contralto 1"),
            Voice::Contralto2 => write!(f, "Contralto 2"),
            Voice::Tenor1 => write!(f, "Tenor 1"),
            Voice::Tenor2 => write!(f, "Tenor 2"),
            Voice::Bass1 => write!(f, "Bajo 1"),
            Voice::Bass2 => write!(f, "Bajo 2"),
            Voice::Director => write!(f, "Director"),
            Voice::Pianist => write!(f, "Pianista"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MemberStatus {
    #[serde(rename = "activo")]
    Active,
    #[serde(rename = "inactivo")]
    Inactive,
    #[serde(rename = "suspendido")]
    Suspended,
}

impl MemberStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            MemberStatus::Active => "activo",
            MemberStatus::Inactive => "inactivo",
            MemberStatus::Suspended => "suspendido",
        }
    }
}

impl std::fmt::Display for MemberStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MemberStatus::Active => write!(f, "Activo"),
            MemberStatus::Inactive => write!(f, "Inactivo"),
            MemberStatus::Suspended => write!(f, "Suspendido"),
        }
    }
}

/// Full roster record for one choir member.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemberProfile {
    pub id: String,
    pub email: String,
    #[serde(rename = "nombre")]
    pub name: String,
    #[serde(rename = "voz")]
    pub voice: Voice,
    #[serde(rename = "fecha_ingreso")]
    pub joined_on: NaiveDate,
    #[serde(rename = "estado")]
    pub status: MemberStatus,
    #[serde(rename = "telefono", default)]
    pub phone: Option<String>,
    /// Outstanding fee balance; negative means the member has credit.
    #[serde(rename = "saldo_actual", default)]
    pub balance: f64,
}

impl MemberProfile {
    pub fn is_active(&self) -> bool {
        self.status == MemberStatus::Active
    }

    pub fn owes_money(&self) -> bool {
        self.balance > 0.0
    }
}

/// Fields a member may change on their own profile.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ProfileUpdate {
    #[serde(rename = "telefono", skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(rename = "voz", skip_serializing_if = "Option::is_none")]
    pub voice: Option<Voice>,
}

/// Admin-side member creation payload.
#[derive(Debug, Clone, Serialize)]
pub struct NewMember {
    pub email: String,
    #[serde(rename = "nombre")]
    pub name: String,
    pub password: String,
    #[serde(rename = "voz")]
    pub voice: Voice,
    #[serde(rename = "fecha_ingreso")]
    pub joined_on: NaiveDate,
    #[serde(rename = "telefono", skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

/// Admin-side partial member update.
#[derive(Debug, Clone, Default, Serialize)]
pub struct MemberUpdate {
    #[serde(rename = "voz", skip_serializing_if = "Option::is_none")]
    pub voice: Option<Voice>,
    #[serde(rename = "estado", skip_serializing_if = "Option::is_none")]
    pub status: Option<MemberStatus>,
    #[serde(rename = "telefono", skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(rename = "saldo_actual", skip_serializing_if = "Option::is_none")]
    pub balance: Option<f64>,
}

/// Paged roster listing returned by the admin members endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct MemberList {
    pub total: u64,
    #[serde(default)]
    pub limit: Option<u32>,
    #[serde(default)]
    pub offset: Option<u32>,
    pub members: Vec<MemberProfile>,
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_member_profile() {
        let json = r#"{
            "id": "m-7",
            "email": "ana@coro.example",
            "nombre": "Ana Torres",
            "voz": "contralto1",
            "fecha_ingreso": "2023-02-14",
            "estado": "activo",
            "telefono": "+34 600 111 222",
            "saldo_actual": 25.5
        }"#;

        let profile: MemberProfile = serde_json::from_str(json).unwrap();
        assert_eq!(profile.voice, Voice::Contralto1);
        assert!(profile.is_active());
        assert!(profile.owes_money());
        assert_eq!(profile.voice.to_string(), "Contralto 1");
    }

    #[test]
    fn voice_round_trips_through_wire_names() {
        for voice in Voice::ALL {
            let json = serde_json::to_string(&voice).unwrap();
            assert_eq!(json, format!("\"{}\"", voice.as_str()));
            let back: Voice = serde_json::from_str(&json).unwrap();
            assert_eq!(back, voice);
        }
    }

    #[test]
    fn profile_update_serializes_only_set_fields() {
        let update = ProfileUpdate {
            phone: Some("+34 600 333 444".to_string()),
            voice: None,
        };
        let json = serde_json::to_value(&update).unwrap();
        assert_eq!(json["telefono"], "+34 600 333 444");
        assert!(json.get("voz").is_none());
    }
}
