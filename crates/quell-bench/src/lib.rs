//! Benchmark-only crate; see `benches/` for the criterion harnesses.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]
