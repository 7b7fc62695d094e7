//! Shopbook: bookkeeping core for a small retail shop.
//!
//! This crate provides the business core behind an income/expense dashboard
//! for a single shop: reminder tasks tied to upcoming financial events,
//! persisted to a row-oriented remote store addressed by opaque string
//! identifiers.
//!
//! # Architecture
//!
//! Shopbook follows hexagonal architecture principles:
//!
//! - **Domain**: Pure business logic with no infrastructure dependencies
//! - **Ports**: Abstract trait interfaces for external interactions
//! - **Adapters**: Concrete implementations of ports (stores, transports)
//!
//! Chart rendering, theming, CORS plumbing and the concrete HTTP transport
//! to the spreadsheet backend live in the surrounding application, not here.
//!
//! # Modules
//!
//! - [`reminder`]: reminder tasks for expected income and expense events

pub mod reminder;
