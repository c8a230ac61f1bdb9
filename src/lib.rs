// src/lib.rs

//! coursewatch library
//!
//! Watches one Canvas course and announces new files and assignments in a
//! Discord channel.

pub mod error;
pub mod models;
pub mod pipeline;
pub mod services;
pub mod storage;
pub mod utils;
