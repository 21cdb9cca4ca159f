//! ISP customer portal: subscriber dashboard, usage, billing history and
//! support tickets over a PostgreSQL or in-memory store.

pub mod config;
pub mod dtos;
pub mod handlers;
pub mod models;
pub mod services;
pub mod session;
pub mod startup;
