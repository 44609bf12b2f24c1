//! CASA Pipeline - request backbone of the CASA case-management app.
//!
//! Gates every request through authentication and an explicit
//! authorization decision, classifies failures into a small taxonomy with
//! format-aware responses, and runs the two outbound workflows whose
//! outcomes are tracked per item: SMS delivery and batch URL shortening.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
