//! Classical B-tree collections with a runtime-tunable minimum degree.
//!
//! This crate provides [`MDBTreeSet`], an ordered set implemented as a
//! textbook B-tree whose minimum degree `t` is chosen when the set is
//! constructed. The degree fixes every node's capacity - between `t - 1`
//! and `2t - 1` keys per non-root node - so one type covers shapes from a
//! 2-3-4 tree (`t = 2`) up to wide, shallow nodes sized for cache lines.
//!
//! All three operations run in a single root-to-leaf pass with
//! `O(t log_t n)` comparisons:
//!
//! - [`search`](MDBTreeSet::search) - binary search per node on the way down
//! - [`insert`](MDBTreeSet::insert) - full nodes split *before* the descent
//!   enters them, so splits never cascade back up
//! - [`remove`](MDBTreeSet::remove) - minimum-size nodes are thickened
//!   (rotate or merge) *before* the descent enters them, so underflow never
//!   propagates back up
//!
//! # Example
//!
//! ```
//! use kiri_tree::{Error, MDBTreeSet};
//!
//! let mut set = MDBTreeSet::new(2).unwrap();
//!
//! for key in [41, 27, 68, 5, 99] {
//!     set.insert(key);
//! }
//!
//! // Duplicates overwrite rather than accumulate.
//! assert_eq!(set.insert(27), Some(27));
//! assert_eq!(set.len(), 5);
//!
//! assert_eq!(set.search(&68), Ok(&68));
//! assert_eq!(set.remove(&68), Ok(68));
//! assert_eq!(set.remove(&68), Err(Error::KeyNotFound));
//! ```
//!
//! # Features
//!
//! - **`no_std` compatible** - only requires `alloc`
//! - **Arena-backed** - nodes live in one slot arena addressed by niche-packed
//!   handles; no per-node allocation, no reference counting
//! - **Single-pass mutation** - preemptive split/thicken keeps every change
//!   strictly top-down

#![no_std]
// These forbid rules and lint groups are meant to be very restrictive.
#![forbid(unsafe_code)]
#![forbid(keyword_idents)]
#![forbid(non_ascii_idents)]
#![forbid(unreachable_pub)]
#![warn(clippy::all)]
#![warn(clippy::cargo)]
#![warn(clippy::pedantic)]
// Enable coverage attributes for nightly builds.
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

extern crate alloc;

mod raw;

pub mod mdbtree_set;

pub use mdbtree_set::{Error, MDBTreeSet};
