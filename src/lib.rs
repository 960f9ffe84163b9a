//! Warehouse allocation engine.
//!
//! A deterministic, side-effect-free core that decides which lots, from which
//! locations, in what order should be picked to satisfy demand: FEFO/FIFO lot
//! selection, wholesale single-lot consolidation, multi-order wave batching,
//! pick-route optimization, slotting recommendations, and inventory health
//! analytics.
//!
//! The engine performs no I/O, holds no locks, and keeps no state between
//! calls. Every function takes a caller-supplied snapshot and returns a
//! proposal; the caller re-validates quantities at commit time and applies
//! the decrements to its own system of record.
#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]
#![allow(elided_lifetimes_in_paths)]
#![warn(clippy::all, clippy::perf, clippy::dbg_macro)]

pub mod errors;
pub mod models;
pub mod services;

pub use errors::AllocationError;
