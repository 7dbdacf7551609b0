pub mod client;

pub use client::MapClient;
