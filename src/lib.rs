//! Tour Forms - public submission pipeline
//!
//! Accepts tour bookings, airport pickup requests, contact messages and
//! newsletter signups. Every submission is rate limited per caller IP and
//! per email address, validated, stored, and announced to the back office.

#![allow(missing_docs)]

pub mod api;
pub mod app;
pub mod app_info;
pub mod boot;
pub mod cli;
pub mod clock;
pub mod commands;
pub mod config;
pub mod database;
pub mod environment;
pub mod forms;
pub mod notifications;
pub mod persistence;
pub mod rate_limiting;
pub mod router;
pub mod setup_tracing;
pub mod submissions;
