//! Survey Engine - Classroom survey submission and analytics
//!
//! Teachers author surveys and assign them to sections; students submit one
//! validated response per survey; teachers read per-question aggregates and
//! participation rates.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
