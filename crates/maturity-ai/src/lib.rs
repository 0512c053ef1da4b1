//! Core pipeline for the data maturity self-assessment service.
//!
//! The submission flow is a sequential pipeline: answers are scored against the
//! standard questionnaire, a prompt is built from the sanitized respondent
//! profile and scores, a completion client requests the narrative analysis, the
//! normalizer turns the model output into a canonical `Analysis` record, and the
//! result store persists the assembled result under a short shareable id. The
//! HTTP router in [`router`] is the single boundary that translates pipeline
//! outcomes into the public wire contract.

pub mod analysis;
pub mod assessment;
pub mod config;
pub mod diagnostics;
pub mod error;
pub mod gate;
pub mod results;
pub mod router;
pub mod telemetry;
