//! Wardboard Core Library
//!
//! Local-first hospital ward tracker: room occupancy, patient
//! admission/discharge, and ad-hoc research data forms, all persisted in a
//! single SQLite database.
//!
//! # Architecture
//!
//! ```text
//!  Room Grid ──click──► Room Detail ◄──────────┐
//!      ▲               (occupied/vacant)       │
//!      │                │    │    │            │
//!      │          admission  │  research form  │
//!  Settings              discharge │           │
//!  (rooms, doctors,      │    │    │       select research
//!   research defs)       ▼    ▼    ▼           │
//!      │             ┌─────────────────────────┴───┐
//!      └────────────►│     Database (schema v3)    │
//!                    │ current_patients researches │
//!                    │ past_patients research_data │
//!                    │        app_settings         │
//!                    └─────────────────────────────┘
//! ```
//!
//! Screens read through the [`Database`] handle, hold their draft state in
//! per-screen view models, and write back on explicit user actions. The
//! storage engine's primary keys and the two unique indexes (one patient per
//! room, one datum per patient/research pair) are the only integrity guards.
//!
//! # Modules
//!
//! - [`db`]: SQLite database layer with versioned, cumulative migrations
//! - [`models`]: Domain types (patients, research definitions, field values)
//! - [`ui`]: Per-screen view models for the four screens

pub mod db;
pub mod models;
pub mod ui;

// Re-export commonly used types
pub use db::Database;
pub use models::{
    CurrentPatient, FieldDef, FieldKind, FieldValue, PastPatient, Research, ResearchDatum,
    ResearchDraft, Sex,
};
pub use ui::{AdmissionForm, AdmissionOutcome, RoomDetail, RoomGrid, SettingsScreen};
