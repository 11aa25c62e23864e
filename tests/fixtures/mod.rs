//! Test fixtures for walk-planner.
//!
//! Provides:
//! - Walkable Las Vegas Strip locations
//! - A scripted in-process directions gateway
//! - One-shot local HTTP servers for the provider clients

#![allow(dead_code, unused_imports)]

pub mod gateway;
pub mod http;
pub mod strip_locations;

pub use gateway::*;
pub use http::*;
pub use strip_locations::*;
