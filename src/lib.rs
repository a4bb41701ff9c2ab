//! PeakPath - Strengths-Based Coaching Backend
//!
//! This crate parses CliftonStrengths assessment PDFs into ranked strength
//! profiles and drives personalized coaching conversations through an AI
//! provider.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
