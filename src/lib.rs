//! Urzasight Server Library
//!
//! Manga page OCR followed by an educational Japanese analysis from an LLM.
//! The binary in main.rs wires these modules into an axum server; the
//! integration tests drive the same router.
//!
//! # Modules
//!
//! - `image`: data-URI / base64 payload decoding
//! - `ocr`: text detection providers (Google Vision, mock)
//! - `translate`: Google Translate client
//! - `analysis`: prompts, LLM providers, and response recovery
//! - `pipeline`: request orchestration
//! - `routes`: HTTP surface

pub mod analysis;
pub mod config;
pub mod error;
pub mod image;
pub mod ocr;
pub mod pipeline;
pub mod routes;
pub mod state;
pub mod translate;
