pub mod codec;
pub mod data;
pub mod engine;
pub mod manager;
