pub mod ai_gateway;
pub mod analyzer;
pub mod events;
pub mod sentiment;
