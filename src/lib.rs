//! # Flower Guide
//!
//! A local-first flower meaning reference.
//!
//! Flower Guide loads one or more CSV files of flowers (name, meaning,
//! birth flower, origins, trivia), merges them into a single deduplicated
//! in-memory store, and lets you browse, search, draw random flowers, or
//! quiz yourself. Each flower shown can be illustrated with an image URL
//! looked up on Wikipedia.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────┐   ┌──────────────┐   ┌──────────────┐
//! │  CSV files   │──▶│    Loader    │──▶│ RecordStore  │
//! │ utf-8 / sjis │   │ decode+dedup │   │  (Arc, r/o)  │
//! └──────────────┘   └──────────────┘   └──────┬───────┘
//!                                              │
//!                      ┌───────────────────────┤
//!                      ▼                       ▼
//!                ┌──────────┐          ┌───────────────┐
//!                │   CLI    │─────────▶│ ImageResolver │──▶ MediaWiki API
//!                │(flowers) │          │  (TTL cache)  │
//!                └──────────┘          └───────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```bash
//! flowers list                  # every flower, sorted
//! flowers show Rose             # one flower with its image
//! flowers search love           # substring search over all fields
//! flowers random                # draw a flower
//! flowers quiz                  # guess the flower from its meaning
//! flowers sources               # what was loaded from where
//! ```
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | TOML configuration parsing |
//! | [`models`] | Core data types |
//! | [`loader`] | File discovery, decoding, parsing, dedup |
//! | [`store`] | Lookup, listing, search, random pick |
//! | [`cache`] | TTL cache |
//! | [`image`] | Image search providers and resolver |
//! | [`session`] | Per-session selection state |
//! | [`display`] | Text rendering |

pub mod app;
pub mod browse;
pub mod cache;
pub mod config;
pub mod display;
pub mod image;
pub mod loader;
pub mod models;
pub mod quiz;
pub mod random;
pub mod search;
pub mod session;
pub mod sources;
pub mod store;
