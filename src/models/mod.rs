//! Data models for CoroDesk entities.
//!
//! This module contains all the data structures exchanged with the
//! choir-management API:
//!
//! - `User`, `TokenPair`, `LoginResponse`: accounts and session tokens
//! - `MemberProfile`, `Voice`: choir roster
//! - `Rehearsal`, `AttendanceRecord`, `AttendanceStats`: rehearsal tracking
//! - `Fee`, `FinanceSummary`: membership fees
//! - `Event`, `NewsItem`, `Page`: the public-facing surface
//!
//! Wire names follow the API's Spanish snake_case fields; the auth and
//! dashboard endpoints use camelCase instead. Struct fields stay English,
//! with serde renames carrying the difference.

use serde::{Deserialize, Serialize};

pub mod attendance;
pub mod event;
pub mod finance;
pub mod member;
pub mod news;
pub mod rehearsal;
pub mod user;

pub use attendance::{
    AttendanceEntry, AttendanceRecord, AttendanceReport, AttendanceReportRecord, AttendanceStats,
    AttendanceUpdate, NewAttendance,
};
pub use event::{Event, EventKind, EventList, EventStatus, EventUpdate, NewEvent};
pub use finance::{
    Fee, FeeKind, FeeList, FeeStatus, FeeUpdate, FinanceReport, FinanceSummary, NewFee, PayRequest,
    PaymentList, PaymentReceipt,
};
pub use member::{
    MemberList, MemberProfile, MemberStatus, MemberUpdate, NewMember, ProfileUpdate, Voice,
};
pub use news::{Audience, NewsItem, Page};
pub use rehearsal::{NewRehearsal, Rehearsal, RehearsalKind, RehearsalList, RehearsalUpdate};
pub use user::{LoginRequest, LoginResponse, RegisterRequest, TokenPair, User, UserRole};

/// Plain `{"message": ...}` acknowledgement some endpoints return.
#[derive(Debug, Clone, Deserialize)]
pub struct Message {
    pub message: String,
}

/// Headline numbers for the admin dashboard. camelCase on the wire.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardStats {
    #[serde(rename = "totalMembers")]
    pub total_members: u64,
    #[serde(rename = "activeMembers")]
    pub active_members: u64,
    #[serde(rename = "inactiveMembers")]
    pub inactive_members: u64,
    #[serde(rename = "upcomingEvents")]
    pub upcoming_events: u64,
    #[serde(rename = "upcomingRehearsals")]
    pub upcoming_rehearsals: u64,
    pub finance: FinanceSummary,
}
