//! This crate provides [`IntervalMap`] and [`IntervalSet`], data
//! structures for storing non-overlapping half-open integer intervals,
//! based off [`BTreeMap`].
//!
//! [`IntervalMap`] maps intervals to values and resolves overlapping
//! range writes through an injectable conflict policy, which makes it a
//! small building block for sweep-style problems: the classic skyline
//! computation is a map with the [`maximum`] policy, and coverage
//! tracking is [`IntervalSet`].
//!
//! ## Example computing a skyline
//!
//! ```rust
//! use spanfold::policy::maximum;
//! use spanfold::IntervalMap;
//!
//! let mut skyline = IntervalMap::with_policy(maximum);
//!
//! // (left, right, height) per building
//! for (left, right, height) in
//! 	[(2, 9, 10), (3, 7, 15), (5, 12, 12), (15, 20, 10), (19, 24, 8)]
//! {
//! 	skyline.update(left, right, height).unwrap();
//! }
//! skyline.defragment();
//!
//! assert_eq!(
//! 	skyline
//! 		.iter()
//! 		.map(|(iv, &height)| (iv.start, iv.end, height))
//! 		.collect::<Vec<_>>(),
//! 	[(2, 3, 10), (3, 7, 15), (7, 12, 12), (15, 20, 10), (20, 24, 8)]
//! );
//! ```
//!
//! ## Example tracking booked slots
//!
//! ```rust
//! use spanfold::interval::ie;
//! use spanfold::IntervalSet;
//!
//! let mut booked = IntervalSet::new();
//!
//! booked.update(1, 5).unwrap();
//! booked.update(10, 15).unwrap();
//!
//! assert_eq!(booked.intersects(ie(5, 10)), Ok(false));
//! assert_eq!(booked.intersects(ie(4, 12)), Ok(true));
//! ```
//!
//! ## Key Understandings and Philosophies:
//!
//! ### Half-open-ness
//!
//! Every interval in this crate is inclusive of its `start` and exclusive
//! of its `end`, so `4..6` contains the points `4` and `5` and nothing
//! else. Intervals that share an endpoint, such as `2..4` and `4..6`, do
//! not overlap.
//!
//! ### Invalid Ranges
//!
//! A range is only valid if it contains at least one point of the
//! underlying domain, that is if `start < end`. Invalid ranges are never
//! stored; operations given one return [`RangeError`] instead of
//! panicking.
//!
//! ### Fragmentation
//!
//! Range writes preserve disjointness but not minimality: two adjacent
//! stored intervals may hold equal values after a write. Queries are
//! unaffected, and [`IntervalMap::defragment`] restores the minimal
//! representation on demand.
//!
//! # Similar Crates
//!
//! - <https://docs.rs/rangemap>
//!   Maps of `Range` keys with eager coalescing, but with a fixed
//!   last-write-wins resolution instead of an injectable policy.
//! - <https://docs.rs/nodit>
//!   A generic superset of this idea over custom interval types, without
//!   policy-folding range writes.
//!
//! [`BTreeMap`]: https://doc.rust-lang.org/std/collections/struct.BTreeMap.html
//! [`maximum`]: crate::policy::maximum

#![allow(clippy::tabs_in_doc_comments)]

pub(crate) mod utils;

pub mod endpoint;
pub mod interval;
pub mod map;
pub mod policy;
pub mod set;

pub use crate::endpoint::Endpoint;
pub use crate::interval::Interval;
pub use crate::map::{IntervalMap, RangeError};
pub use crate::set::IntervalSet;
