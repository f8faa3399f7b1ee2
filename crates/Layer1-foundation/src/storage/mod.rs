//! Storage module for Maya Connect
//!
//! - `json`: JSON - 설정 및 Hub fixture 파일 로드/저장

mod json;

pub use json::JsonStore;
