//! Patient records service: a JSON API over a local SQLite store, with an
//! AI-backed pipeline that turns uploaded prescription images into
//! structured patient records.

pub mod ai;
pub mod api;
pub mod config;
pub mod db;
pub mod models;
pub mod pipeline;
