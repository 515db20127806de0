//! # FactGuard
//!
//! A claim-analysis backend. A text claim comes in over HTTP, flows
//! through remote pre-trained ML pipelines (named entities, sentiment,
//! semantic similarity, fake-news classification) and third-party
//! fact-check/search APIs, gets a resolved verdict and credibility label,
//! and leaves behind exactly one write-once audit record.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────┐   ┌───────────────┐   ┌──────────────┐
//! │  Inference   │   │   Evidence    │   │  Generative  │
//! │ NER/Sent/FN  │   │ FactCheck/    │──▶│  Summarizer  │
//! │ /Similarity  │   │ News/SerpAPI  │   │   (Gemini)   │
//! └──────┬───────┘   └───────┬───────┘   └──────┬───────┘
//!        │                   └──────┬───────────┘
//!        ▼                          ▼
//!   ┌─────────────────────────────────────┐
//!   │        Verdict Resolver             │
//!   │  (api precedence | custom model)    │
//!   └──────────────────┬──────────────────┘
//!                      ▼
//!          ┌───────────────────────┐
//!          │  History (SQLite)     │──▶ CSV export
//!          └───────────────────────┘
//! ```
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | TOML configuration and environment credentials |
//! | [`models`] | Core data types |
//! | [`evidence`] | Fact-check / news / search evidence providers |
//! | [`inference`] | Remote NER, sentiment, and fake-news pipelines |
//! | [`similarity`] | Embedding-based semantic similarity |
//! | [`gemini`] | Generative summarizer |
//! | [`custom_model`] | External custom fact-checking model client |
//! | [`verdict`] | Verdict resolution strategies |
//! | [`history`] | Write-once query history store |
//! | [`export`] | CSV export of the history table |
//! | [`server`] | HTTP API server |
//! | [`db`] | Database connection |
//! | [`migrate`] | Schema migrations |

pub mod config;
pub mod custom_model;
pub mod db;
pub mod evidence;
pub mod export;
pub mod gemini;
pub mod history;
pub mod inference;
pub mod migrate;
pub mod models;
pub mod server;
pub mod similarity;
pub mod verdict;
