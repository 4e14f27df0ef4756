//! Candidate ranking: reranking retrieval hits, assembling the response, and
//! the HTTP surface that drives a ranking run.

pub mod assembler;
pub mod engine;
pub mod handlers;
pub mod reranker;
