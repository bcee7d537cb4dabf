use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Payment state of a fee. The API settled on feminine forms
/// (`pagada`/`vencida`) but some update paths still send the older
/// masculine spellings, kept as read aliases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FeeStatus {
    #[serde(rename = "pendiente")]
    Pending,
    #[serde(rename = "pagada", alias = "pagado")]
    Paid,
    #[serde(rename = "vencida", alias = "atrasado")]
    Overdue,
}

impl FeeStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            FeeStatus::Pending => "pendiente",
            FeeStatus::Paid => "pagada",
            FeeStatus::Overdue => "vencida",
        }
    }
}

impl std::fmt::Display for FeeStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FeeStatus::Pending => write!(f, "Pendiente"),
            FeeStatus::Paid => write!(f, "Pagada"),
            FeeStatus::Overdue => write!(f, "Vencida"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FeeKind {
    Regular,
    #[serde(rename = "extraordinaria")]
    Extraordinary,
}

impl FeeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FeeKind::Regular => "regular",
            FeeKind::Extraordinary => "extraordinaria",
        }
    }
}

/// A membership fee (cuota) charged to one member.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Fee {
    pub id: String,
    #[serde(rename = "miembro_id")]
    pub member_id: String,
    #[serde(rename = "miembro_nombre", default)]
    pub member_name: Option<String>,
    #[serde(rename = "monto")]
    pub amount: f64,
    #[serde(rename = "descripcion", default)]
    pub description: Option<String>,
    #[serde(rename = "tipo")]
    pub kind: FeeKind,
    #[serde(rename = "fecha_vencimiento", alias = "vencimiento")]
    pub due_date: NaiveDate,
    #[serde(rename = "estado")]
    pub status: FeeStatus,
    #[serde(rename = "fecha_pago", default)]
    pub paid_on: Option<NaiveDate>,
    #[serde(rename = "created_by", default)]
    pub created_by: Option<String>,
    #[serde(rename = "created_at", default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl Fee {
    pub fn is_paid(&self) -> bool {
        self.status == FeeStatus::Paid
    }

    pub fn is_overdue(&self) -> bool {
        self.status == FeeStatus::Overdue
    }

    pub fn formatted_due_date(&self) -> String {
        self.due_date.format("%d/%m/%Y").to_string()
    }
}

/// Admin-side fee creation payload.
#[derive(Debug, Clone, Serialize)]
pub struct NewFee {
    #[serde(rename = "miembro_id")]
    pub member_id: String,
    #[serde(rename = "monto")]
    pub amount: f64,
    #[serde(rename = "descripcion", skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(rename = "tipo")]
    pub kind: FeeKind,
    #[serde(rename = "fecha_vencimiento")]
    pub due_date: NaiveDate,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct FeeUpdate {
    #[serde(rename = "monto", skip_serializing_if = "Option::is_none")]
    pub amount: Option<f64>,
    #[serde(rename = "descripcion", skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(rename = "fecha_vencimiento", skip_serializing_if = "Option::is_none")]
    pub due_date: Option<NaiveDate>,
    #[serde(rename = "estado", skip_serializing_if = "Option::is_none")]
    pub status: Option<FeeStatus>,
}

/// Body for marking a fee paid. An empty body lets the API stamp today.
#[derive(Debug, Clone, Default, Serialize)]
pub struct PayRequest {
    #[serde(rename = "fecha_pago", skip_serializing_if = "Option::is_none")]
    pub paid_on: Option<NaiveDate>,
}

/// Minimal acknowledgement the pay endpoint returns.
#[derive(Debug, Clone, Deserialize)]
pub struct PaymentReceipt {
    pub id: String,
    #[serde(rename = "estado")]
    pub status: FeeStatus,
    #[serde(rename = "fecha_pago", default)]
    pub paid_on: Option<NaiveDate>,
}

/// Totals shown on finance dashboards. This endpoint is one of the few
/// that speaks camelCase.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FinanceSummary {
    #[serde(rename = "totalIngresos")]
    pub total_income: f64,
    #[serde(rename = "totalPendiente")]
    pub total_pending: f64,
    #[serde(rename = "totalVencido")]
    pub total_overdue: f64,
}

/// Date-ranged finance report with the fee rows backing the totals.
#[derive(Debug, Clone, Deserialize)]
pub struct FinanceReport {
    #[serde(rename = "total_ingresos")]
    pub total_income: f64,
    #[serde(rename = "total_pendiente")]
    pub total_pending: f64,
    #[serde(rename = "total_vencido")]
    pub total_overdue: f64,
    #[serde(rename = "cuotas")]
    pub fees: Vec<Fee>,
}

/// Paged fee listing from the admin finance endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct FeeList {
    #[serde(rename = "cuotas")]
    pub fees: Vec<Fee>,
    pub total: u64,
}

/// Paged payment history; rows are the paid fees themselves.
#[derive(Debug, Clone, Deserialize)]
pub struct PaymentList {
    pub payments: Vec<Fee>,
    pub total: u64,
}

// ============================================================================
// Tests
// ============================================================================
