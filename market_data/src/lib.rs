//! Market-data collaborator for the ATH watch engine.
//!
//! [`models`] holds the vendor-agnostic bar, series and instrument types, and
//! [`providers`] defines the [`DataProvider`](providers::DataProvider)
//! capability trait together with a Yahoo Finance implementation.

pub mod models;
pub mod providers;
