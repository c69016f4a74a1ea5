//! Wata Callback - signature-verified payment notifications for the Wata.pro gateway.
//!
//! Receives the gateway's asynchronous payment callbacks, proves they are
//! authentic, matches them against issued purchase requests and settles
//! those requests exactly once.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
