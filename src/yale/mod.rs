// MIT License - Copyright (c) 2026 Peter Wright
// Yale Sync remote service

pub mod client;
pub mod model;

pub use client::YaleClient;
