// Adapters layer: concrete implementations for external systems (console, input parsing, llm http)

pub mod console;
pub mod input;
pub mod llm;
