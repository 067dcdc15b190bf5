//! Social network clients for Skimmer.
//!
//! Currently only the Twitter v1.1-style timeline pipeline is implemented:
//! profile lookup, timeline retrieval with reply filtering, and display
//! oriented text enrichment.

pub mod twitter;
