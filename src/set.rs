//! A module containing [`IntervalSet`].

use std::fmt;

use crate::map::{IntoIter as MapIntoIter, RangeError};
use crate::{Endpoint, Interval, IntervalMap};

/// An ordered set of non-overlapping half-open intervals, based on
/// [`IntervalMap`].
///
/// `I` is the point type the intervals are over. Adding an interval that
/// overlaps stored ones absorbs them; as with the map, adjacent stored
/// intervals may stay split until [`defragment`](IntervalSet::defragment)
/// runs.
///
/// # Examples
/// ```
/// use spanfold::IntervalSet;
///
/// let mut set = IntervalSet::new();
///
/// set.update(1, 3).unwrap();
/// set.update(6, 9).unwrap();
/// set.update(2, 5).unwrap();
/// set.defragment();
///
/// assert_eq!(
/// 	set.iter().map(|iv| (iv.start, iv.end)).collect::<Vec<_>>(),
/// 	[(1, 5), (6, 9)]
/// );
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct IntervalSet<I> {
	inner: IntervalMap<I, ()>,
}

impl<I> IntervalSet<I> {
	/// Makes a new, empty set.
	///
	/// # Examples
	/// ```
	/// use spanfold::IntervalSet;
	///
	/// let set: IntervalSet<i8> = IntervalSet::new();
	/// ```
	pub fn new() -> Self {
		IntervalSet {
			inner: IntervalMap::new(),
		}
	}

	/// Returns the number of intervals in the set.
	pub fn len(&self) -> usize {
		self.inner.len()
	}

	/// Returns `true` if the set contains no intervals.
	pub fn is_empty(&self) -> bool {
		self.inner.is_empty()
	}

	/// Returns an iterator over every interval in the set in ascending
	/// order, reflecting the current fragmentation state.
	pub fn iter(&self) -> impl DoubleEndedIterator<Item = &Interval<I>> {
		self.inner.iter().map(first)
	}

	/// Returns the first interval in the set, if any.
	pub fn first(&self) -> Option<&Interval<I>> {
		self.inner.first_key_value().map(first)
	}

	/// Returns the last interval in the set, if any.
	pub fn last(&self) -> Option<&Interval<I>> {
		self.inner.last_key_value().map(first)
	}
}

impl<I> IntervalSet<I>
where
	I: Endpoint,
{
	/// Adds the half-open range `[start, end)` to the set, absorbing any
	/// stored intervals it overlaps.
	///
	/// # Errors
	///
	/// Fails fast, before any mutation: [`RangeError::RangeOverflow`] if
	/// `end` is the minimum value of the point domain, otherwise
	/// [`RangeError::InvalidRange`] if `start >= end`.
	///
	/// # Examples
	/// ```
	/// use spanfold::{IntervalSet, RangeError};
	///
	/// let mut set = IntervalSet::new();
	///
	/// set.update(1, 3).unwrap();
	/// assert_eq!(set.update(3, 3), Err(RangeError::InvalidRange));
	/// ```
	pub fn update(&mut self, start: I, end: I) -> Result<(), RangeError> {
		self.inner.update(start, end, ())
	}

	/// Returns `true` if some stored interval covers the given point.
	///
	/// # Examples
	/// ```
	/// use spanfold::IntervalSet;
	///
	/// let mut set = IntervalSet::new();
	///
	/// set.update(1, 4).unwrap();
	///
	/// assert_eq!(set.contains_point(1), true);
	/// assert_eq!(set.contains_point(4), false);
	/// ```
	pub fn contains_point(&self, point: I) -> bool {
		self.inner.contains_point(point)
	}

	/// Returns `true` if the given interval intersects any stored
	/// interval.
	///
	/// # Errors
	///
	/// Fails with [`RangeError::InvalidRange`] if the given interval is
	/// invalid.
	///
	/// # Examples
	/// ```
	/// use spanfold::interval::ie;
	/// use spanfold::IntervalSet;
	///
	/// let mut set = IntervalSet::new();
	///
	/// set.update(1, 5).unwrap();
	/// set.update(10, 15).unwrap();
	///
	/// assert_eq!(set.intersects(ie(4, 12)), Ok(true));
	/// assert_eq!(set.intersects(ie(5, 10)), Ok(false));
	/// ```
	pub fn intersects(&self, interval: Interval<I>) -> Result<bool, RangeError> {
		self.inner.intersects(interval)
	}

	/// Merges every pair of stored neighbours that are exactly adjacent,
	/// leaving the minimal representation of the same point membership.
	///
	/// # Examples
	/// ```
	/// use spanfold::IntervalSet;
	///
	/// let mut set = IntervalSet::new();
	///
	/// set.update(0, 4).unwrap();
	/// set.update(4, 8).unwrap();
	/// assert_eq!(set.len(), 2);
	///
	/// set.defragment();
	/// assert_eq!(set.len(), 1);
	/// ```
	pub fn defragment(&mut self) {
		self.inner.defragment();
	}
}

fn first<A, B>((a, _): (A, B)) -> A {
	a
}

// Trait Impls ==========================

impl<I> Default for IntervalSet<I> {
	fn default() -> Self {
		IntervalSet::new()
	}
}

impl<I> IntoIterator for IntervalSet<I> {
	type Item = Interval<I>;
	type IntoIter = IntoIter<I>;
	fn into_iter(self) -> Self::IntoIter {
		IntoIter {
			inner: self.inner.into_iter(),
		}
	}
}

/// An owning iterator over the intervals of an [`IntervalSet`].
///
/// This `struct` is created by the [`into_iter`] method on
/// [`IntervalSet`] (provided by the [`IntoIterator`] trait). See its
/// documentation for more.
///
/// [`into_iter`]: IntoIterator::into_iter
/// [`IntoIterator`]: core::iter::IntoIterator
pub struct IntoIter<I> {
	inner: MapIntoIter<I, ()>,
}
impl<I> Iterator for IntoIter<I> {
	type Item = Interval<I>;
	fn next(&mut self) -> Option<Self::Item> {
		self.inner.next().map(first)
	}
}

impl<I> fmt::Debug for IntervalSet<I>
where
	I: fmt::Debug,
{
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_set().entries(self.iter()).finish()
	}
}

#[cfg(feature = "serde")]
mod serde {
	use std::fmt;
	use std::marker::PhantomData;

	use serde::de::{SeqAccess, Visitor};
	use serde::ser::SerializeSeq;
	use serde::{Deserialize, Deserializer, Serialize, Serializer};

	use crate::{Endpoint, Interval, IntervalSet};

	impl<I> Serialize for IntervalSet<I>
	where
		I: Serialize,
	{
		fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
		where
			S: Serializer,
		{
			let mut seq = serializer.serialize_seq(Some(self.len()))?;
			for interval in self.iter() {
				seq.serialize_element(&interval)?;
			}
			seq.end()
		}
	}

	impl<'de, I> Deserialize<'de> for IntervalSet<I>
	where
		I: Endpoint + Deserialize<'de>,
	{
		fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
		where
			D: Deserializer<'de>,
		{
			deserializer.deserialize_seq(IntervalSetVisitor { i: PhantomData })
		}
	}

	struct IntervalSetVisitor<I> {
		i: PhantomData<I>,
	}

	impl<'de, I> Visitor<'de> for IntervalSetVisitor<I>
	where
		I: Endpoint + Deserialize<'de>,
	{
		type Value = IntervalSet<I>;

		fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
			formatter.write_str("an IntervalSet")
		}

		fn visit_seq<A>(self, mut access: A) -> Result<Self::Value, A::Error>
		where
			A: SeqAccess<'de>,
		{
			let mut set = IntervalSet::new();
			while let Some(interval) = access.next_element::<Interval<I>>()? {
				if !interval.is_valid() {
					return Err(serde::de::Error::custom("invalid interval"));
				}
				if set
					.last()
					.is_some_and(|last| last.end > interval.start)
				{
					return Err(serde::de::Error::custom(
						"intervals out of order or overlapping",
					));
				}
				set.inner.insert_piece(interval, ());
			}
			Ok(set)
		}
	}
}

#[cfg(test)]
mod tests {
	use pretty_assertions::assert_eq;

	use super::*;
	use crate::interval::ie;
	use crate::RangeError;

	fn entries(set: &IntervalSet<i8>) -> Vec<(i8, i8)> {
		set.iter().map(|iv| (iv.start, iv.end)).collect()
	}

	#[test]
	fn overlapping_additions_merge_after_defragment() {
		let mut set = IntervalSet::new();
		set.update(1, 3).unwrap();
		set.update(6, 9).unwrap();
		set.update(2, 5).unwrap();

		set.defragment();

		assert_eq!(entries(&set), [(1, 5), (6, 9)]);
	}

	#[test]
	fn update_rejects_malformed_ranges() {
		let mut set = IntervalSet::new();
		set.update(0, 4).unwrap();

		assert_eq!(set.update(4, 4), Err(RangeError::InvalidRange));
		assert_eq!(set.update(9, 2), Err(RangeError::InvalidRange));
		assert_eq!(set.update(0, i8::MIN), Err(RangeError::RangeOverflow));
		assert_eq!(entries(&set), [(0, 4)]);
	}

	#[test]
	fn membership_is_half_open() {
		let mut set = IntervalSet::new();
		set.update(1, 4).unwrap();

		assert_eq!(set.contains_point(0), false);
		assert_eq!(set.contains_point(1), true);
		assert_eq!(set.contains_point(3), true);
		assert_eq!(set.contains_point(4), false);
	}

	#[test]
	fn intersects_ignores_shared_endpoints() {
		let mut set = IntervalSet::new();
		set.update(1, 5).unwrap();
		set.update(10, 15).unwrap();

		assert_eq!(set.intersects(ie(4, 12)), Ok(true));
		assert_eq!(set.intersects(ie(5, 10)), Ok(false));
		assert_eq!(set.intersects(ie(0, 1)), Ok(false));
		assert_eq!(set.intersects(ie(14, 20)), Ok(true));
		assert_eq!(set.intersects(ie(7, 7)), Err(RangeError::InvalidRange));
	}

	#[test]
	fn defragment_merges_adjacency_only() {
		let mut set = IntervalSet::new();
		set.update(0, 2).unwrap();
		set.update(3, 5).unwrap();

		set.defragment();

		// a one-point gap keeps the intervals apart
		assert_eq!(entries(&set), [(0, 2), (3, 5)]);
	}

	#[test]
	fn into_iter_yields_intervals_in_order() {
		let mut set = IntervalSet::new();
		set.update(6, 9).unwrap();
		set.update(1, 3).unwrap();

		assert_eq!(
			set.into_iter().collect::<Vec<_>>(),
			[ie(1, 3), ie(6, 9)]
		);
	}
}
