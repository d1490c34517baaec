// file: src/text/mod.rs
// description: character-budget text tools for fitting documents into model prompts
// reference: internal module structure

pub mod chunker;
pub mod compressor;

pub use chunker::{Chunks, TextChunker};
pub use compressor::TextCompressor;
