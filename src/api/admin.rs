//! Admin endpoints: roster, events, rehearsals, attendance and finance
//! management. Every call requires an admin session; the API answers 403
//! for anyone else, which flows through the envelope like any other error.

use crate::models::{
    AttendanceEntry, AttendanceReport, AttendanceUpdate, DashboardStats, Event, EventList,
    EventUpdate, Fee, FeeList, FeeStatus, FeeUpdate, FinanceReport, FinanceSummary, MemberList,
    MemberProfile, MemberStatus, MemberUpdate, Message, NewAttendance, NewEvent, NewFee, NewMember,
    NewRehearsal, PayRequest, PaymentList, PaymentReceipt, Rehearsal, RehearsalList,
    RehearsalUpdate,
};

use super::client::{build_query, ApiClient};
use super::ApiResponse;

/// Borrowed view over the client exposing the admin surface, obtained via
/// [`ApiClient::admin`].
pub struct AdminApi<'a> {
    client: &'a ApiClient,
}

impl ApiClient {
    pub fn admin(&self) -> AdminApi<'_> {
        AdminApi { client: self }
    }
}

impl AdminApi<'_> {
    // ===== Members =====

    /// Paged roster listing with optional name search and status filter.
    pub async fn fetch_members(
        &self,
        search: Option<&str>,
        status: Option<MemberStatus>,
        page: u32,
        limit: u32,
    ) -> ApiResponse<MemberList> {
        let endpoint = build_query(
            "/admin/members",
            &[
                ("search", search.map(str::to_string)),
                ("status", status.map(|s| s.as_str().to_string())),
                ("page", Some(page.to_string())),
                ("limit", Some(limit.to_string())),
            ],
        );
        self.client.get(&endpoint).await
    }

    pub async fn create_member(&self, member: &NewMember) -> ApiResponse<MemberProfile> {
        self.client.post("/admin/members", member).await
    }

    pub async fn fetch_member(&self, id: &str) -> ApiResponse<MemberProfile> {
        self.client.get(&format!("/admin/members/{}", id)).await
    }

    pub async fn update_member(&self, id: &str, update: &MemberUpdate) -> ApiResponse<MemberProfile> {
        self.client.put(&format!("/admin/members/{}", id), update).await
    }

    /// Members are never deleted, only flagged inactive.
    pub async fn deactivate_member(&self, id: &str) -> ApiResponse<MemberProfile> {
        self.client
            .put(
                &format!("/admin/members/{}/deactivate", id),
                &serde_json::json!({ "activo": false }),
            )
            .await
    }

    // ===== Events =====

    pub async fn fetch_events(&self, page: u32, limit: u32) -> ApiResponse<EventList> {
        self.client
            .get(&format!("/admin/events?page={}&limit={}", page, limit))
            .await
    }

    pub async fn create_event(&self, event: &NewEvent) -> ApiResponse<Event> {
        self.client.post("/admin/events", event).await
    }

    pub async fn fetch_event(&self, id: &str) -> ApiResponse<Event> {
        self.client.get(&format!("/admin/events/{}", id)).await
    }

    pub async fn update_event(&self, id: &str, update: &EventUpdate) -> ApiResponse<Event> {
        self.client.put(&format!("/admin/events/{}", id), update).await
    }

    pub async fn delete_event(&self, id: &str) -> ApiResponse<Message> {
        self.client.delete(&format!("/admin/events/{}", id)).await
    }

    // ===== Rehearsals =====

    pub async fn fetch_rehearsals(&self, page: u32, limit: u32) -> ApiResponse<RehearsalList> {
        self.client
            .get(&format!("/admin/rehearsals?page={}&limit={}", page, limit))
            .await
    }

    pub async fn create_rehearsal(&self, rehearsal: &NewRehearsal) -> ApiResponse<Rehearsal> {
        self.client.post("/admin/rehearsals", rehearsal).await
    }

    pub async fn fetch_rehearsal(&self, id: &str) -> ApiResponse<Rehearsal> {
        self.client.get(&format!("/admin/rehearsals/{}", id)).await
    }

    pub async fn update_rehearsal(
        &self,
        id: &str,
        update: &RehearsalUpdate,
    ) -> ApiResponse<Rehearsal> {
        self.client.put(&format!("/admin/rehearsals/{}", id), update).await
    }

    pub async fn delete_rehearsal(&self, id: &str) -> ApiResponse<Message> {
        self.client.delete(&format!("/admin/rehearsals/{}", id)).await
    }

    // ===== Attendance =====

    /// Roster attendance for one rehearsal.
    pub async fn fetch_attendance(&self, rehearsal_id: &str) -> ApiResponse<Vec<AttendanceEntry>> {
        self.client
            .get(&format!("/admin/rehearsals/{}/attendance", rehearsal_id))
            .await
    }

    pub async fn record_attendance(
        &self,
        rehearsal_id: &str,
        attendance: &NewAttendance,
    ) -> ApiResponse<AttendanceEntry> {
        self.client
            .post(&format!("/admin/rehearsals/{}/attendance", rehearsal_id), attendance)
            .await
    }

    pub async fn update_attendance(
        &self,
        rehearsal_id: &str,
        attendance_id: &str,
        update: &AttendanceUpdate,
    ) -> ApiResponse<AttendanceEntry> {
        self.client
            .put(
                &format!("/admin/rehearsals/{}/attendance/{}", rehearsal_id, attendance_id),
                update,
            )
            .await
    }

    /// Attendance totals over a date range, optionally for one member.
    /// Dates are `YYYY-MM-DD`.
    pub async fn attendance_report(
        &self,
        start_date: &str,
        end_date: &str,
        member_id: Option<&str>,
    ) -> ApiResponse<AttendanceReport> {
        let endpoint = build_query(
            "/admin/attendance/report",
            &[
                ("startDate", Some(start_date.to_string())),
                ("endDate", Some(end_date.to_string())),
                ("memberId", member_id.map(str::to_string)),
            ],
        );
        self.client.get(&endpoint).await
    }

    // ===== Finance =====

    pub async fn fetch_fees(
        &self,
        status: Option<FeeStatus>,
        member_id: Option<&str>,
        page: u32,
        limit: u32,
    ) -> ApiResponse<FeeList> {
        let endpoint = build_query(
            "/admin/finance/cuotas",
            &[
                ("status", status.map(|s| s.as_str().to_string())),
                ("memberId", member_id.map(str::to_string)),
                ("page", Some(page.to_string())),
                ("limit", Some(limit.to_string())),
            ],
        );
        self.client.get(&endpoint).await
    }

    pub async fn create_fee(&self, fee: &NewFee) -> ApiResponse<Fee> {
        self.client.post("/admin/finance/cuotas", fee).await
    }

    pub async fn fetch_fee(&self, id: &str) -> ApiResponse<Fee> {
        self.client.get(&format!("/admin/finance/cuotas/{}", id)).await
    }

    pub async fn update_fee(&self, id: &str, update: &FeeUpdate) -> ApiResponse<Fee> {
        self.client.put(&format!("/admin/finance/cuotas/{}", id), update).await
    }

    pub async fn mark_fee_paid(&self, id: &str, payment: &PayRequest) -> ApiResponse<PaymentReceipt> {
        self.client
            .post(&format!("/admin/finance/cuotas/{}/pay", id), payment)
            .await
    }

    pub async fn finance_summary(&self) -> ApiResponse<FinanceSummary> {
        self.client.get("/admin/finance/summary").await
    }

    pub async fn finance_report(
        &self,
        start_date: &str,
        end_date: &str,
        member_id: Option<&str>,
    ) -> ApiResponse<FinanceReport> {
        let endpoint = build_query(
            "/admin/finance/report",
            &[
                ("startDate", Some(start_date.to_string())),
                ("endDate", Some(end_date.to_string())),
                ("memberId", member_id.map(str::to_string)),
            ],
        );
        self.client.get(&endpoint).await
    }

    pub async fn payment_history(&self, page: u32, limit: u32) -> ApiResponse<PaymentList> {
        self.client
            .get(&format!("/admin/finance/payments?page={}&limit={}", page, limit))
            .await
    }

    // ===== Dashboard =====

    pub async fn dashboard_stats(&self) -> ApiResponse<DashboardStats> {
        self.client.get("/admin/dashboard/stats").await
    }
}
