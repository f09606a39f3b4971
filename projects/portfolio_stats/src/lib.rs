//! Coding-profile stats service
//!
//! - Fetches LeetCode, Codeforces and GitHub metrics through `interfaces/`
//! - Keeps one snapshot per day in PostgreSQL or SQLite (`db/`)
//! - REST API endpoints in `endpoints/`, wired in `router`
//! - Reads `DATABASE_URL` to pick the store; defaults to `database.db`

pub mod config;
pub mod db;
pub mod endpoints;
pub mod router;
pub mod services;
pub mod state;
