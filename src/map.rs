//! A module containing [`IntervalMap`].

use std::fmt;

use btree_monstrousity::btree_map::{
	IntoIter as BTreeMapIntoIter, SearchBoundCustom,
};
use btree_monstrousity::BTreeMap;
use itertools::Itertools;
use smallvec::SmallVec;

use crate::interval::ie;
use crate::policy::overwrite;
use crate::utils::{covering_comp, start_comp};
use crate::{Endpoint, Interval};

/// An ordered map of non-overlapping half-open intervals to values, based
/// on [`BTreeMap`].
///
/// `I` is the point type the intervals are over, `V` is the value type,
/// and `F` is the conflict resolution policy applied wherever a range
/// write overlaps a stored entry. `F` defaults to the function pointer
/// type of the built-in policies, so a plain [`IntervalMap<I, V>`] is the
/// [`overwrite`]-policy map.
///
/// Range writes keep stored intervals pairwise disjoint by splitting and
/// merging whatever they overlap, but they do not chase minimality:
/// adjacent entries with equal values may remain stored separately until
/// [`defragment`](IntervalMap::defragment) runs.
///
/// # Examples
/// ```
/// use spanfold::policy::maximum;
/// use spanfold::IntervalMap;
///
/// // Make a map of skyline heights
/// let mut map = IntervalMap::with_policy(maximum);
///
/// map.update(2, 9, 10).unwrap();
/// map.update(3, 7, 15).unwrap();
///
/// assert_eq!(map.get_at_point(5), Some(&15));
/// assert_eq!(map.get_at_point(8), Some(&10));
///
/// // Iterate over the entries in the map
/// for (interval, height) in map.iter() {
/// 	println!("{interval:?}, {height:?}");
/// }
/// ```
///
/// [`BTreeMap`]: https://doc.rust-lang.org/std/collections/struct.BTreeMap.html
pub struct IntervalMap<I, V, F = fn(V, V) -> V> {
	inner: BTreeMap<Interval<I>, V>,
	policy: F,
}

/// The error returned when a range write or an interval query is given a
/// malformed range.
///
/// Both variants are detected before any mutation takes place, so a failed
/// call leaves the container exactly as it was.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangeError {
	/// The range's start was not strictly less than its end, so the range
	/// contains no points.
	InvalidRange,
	/// The range's end was the minimum value of the point domain, so the
	/// probe at `end - 1` would underflow.
	RangeOverflow,
}

impl fmt::Display for RangeError {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			RangeError::InvalidRange => {
				write!(f, "range start must be strictly less than range end")
			}
			RangeError::RangeOverflow => {
				write!(
					f,
					"range end is the minimum of the point domain and cannot be probed"
				)
			}
		}
	}
}

impl std::error::Error for RangeError {}

impl<I, V> IntervalMap<I, V> {
	/// Makes a new, empty map using the [`overwrite`] policy.
	///
	/// # Examples
	/// ```
	/// use spanfold::IntervalMap;
	///
	/// let map: IntervalMap<i8, bool> = IntervalMap::new();
	/// ```
	pub fn new() -> Self {
		IntervalMap {
			inner: BTreeMap::default(),
			policy: overwrite,
		}
	}
}

impl<I, V> Default for IntervalMap<I, V> {
	fn default() -> Self {
		IntervalMap::new()
	}
}

impl<I, V, F> IntervalMap<I, V, F>
where
	I: Endpoint,
	F: FnMut(V, V) -> V,
{
	/// Makes a new, empty map using the given conflict policy.
	///
	/// The policy is invoked as `policy(old, new)` on exactly the
	/// sub-range where a write overlaps a stored entry; non-commutative
	/// policies are fully supported.
	///
	/// # Examples
	/// ```
	/// use spanfold::IntervalMap;
	///
	/// // keep whichever value was written first
	/// let mut map = IntervalMap::with_policy(|old: u8, _new| old);
	///
	/// map.update(0, 10, 1).unwrap();
	/// map.update(5, 15, 2).unwrap();
	///
	/// assert_eq!(map.get_at_point(7), Some(&1));
	/// assert_eq!(map.get_at_point(12), Some(&2));
	/// ```
	pub fn with_policy(policy: F) -> Self {
		IntervalMap {
			inner: BTreeMap::default(),
			policy,
		}
	}

	/// Writes `value` over the half-open range `[start, end)`.
	///
	/// After the call, every point `x` in `[start, end)` maps to
	/// `policy(previous_value_at_x, value)` where a previous value existed
	/// and to `value` where none did; points outside the range are
	/// untouched. Stored intervals overlapped by the write are split and
	/// re-emitted as needed to keep the store pairwise disjoint.
	///
	/// The write does not guarantee minimal fragmentation: adjacent
	/// equal-valued entries can remain split until
	/// [`defragment`](IntervalMap::defragment) runs.
	///
	/// # Errors
	///
	/// Fails fast, before any mutation: [`RangeError::RangeOverflow`] if
	/// `end` is the minimum value of the point domain (the internal
	/// `end - 1` probe would underflow), otherwise
	/// [`RangeError::InvalidRange`] if `start >= end`.
	///
	/// # Complexity
	///
	/// `O(k log n)` where `k` is the number of stored intervals the write
	/// overlaps.
	///
	/// # Examples
	/// ```
	/// use spanfold::{IntervalMap, RangeError};
	///
	/// let mut map = IntervalMap::new();
	///
	/// map.update(5, 15, 10).unwrap();
	/// map.update(0, 20, 5).unwrap();
	/// map.defragment();
	///
	/// assert_eq!(
	/// 	map.iter().map(|(iv, &v)| (iv.start, iv.end, v)).collect::<Vec<_>>(),
	/// 	[(0, 20, 5)]
	/// );
	///
	/// assert_eq!(map.update(8, 4, 1), Err(RangeError::InvalidRange));
	/// assert_eq!(map.update(-5, i8::MIN, 1), Err(RangeError::RangeOverflow));
	/// ```
	pub fn update(&mut self, start: I, end: I, value: V) -> Result<(), RangeError>
	where
		V: Clone + Eq,
	{
		if end.down().is_none() {
			return Err(RangeError::RangeOverflow);
		}
		if start >= end {
			return Err(RangeError::InvalidRange);
		}

		// Segments of the write still to be applied. Each overlapped
		// stored interval queues at most one follow-up segment, so the
		// depth stays bounded by the overlap count, not the domain size.
		let mut pending: SmallVec<[(I, I); 2]> = SmallVec::new();
		pending.push((start, end));

		while let Some((start, end)) = pending.pop() {
			// A stored interval covers `start`: resolve the overlap here.
			let covering = self
				.inner
				.get_key_value(covering_comp(start))
				.map(|(key, _)| key)
				.copied();
			if let Some(covering) = covering {
				let old = self.inner.remove(covering_comp(start)).unwrap();
				let resolved = (self.policy)(old.clone(), value.clone());

				if covering.end > end {
					// Up to three pieces: the prefix and the tail keep the
					// old value, the overlapped middle resolves. One piece
					// when resolution changed nothing.
					if resolved == old {
						self.insert_piece(covering, resolved);
					} else {
						if covering.start != start {
							self.insert_piece(
								ie(covering.start, start),
								old.clone(),
							);
						}
						self.insert_piece(ie(start, end), resolved);
						self.insert_piece(ie(end, covering.end), old);
					}
				} else {
					// The covering interval ends inside the write. What
					// lies beyond it is unknown, so that remainder goes
					// through the full case selection again.
					if resolved == old {
						self.insert_piece(covering, resolved);
					} else {
						if covering.start != start {
							self.insert_piece(
								ie(covering.start, start),
								old.clone(),
							);
						}
						self.insert_piece(ie(start, covering.end), resolved);
					}

					if covering.end != end {
						pending.push((covering.end, end));
					}
				}

				continue;
			}

			// A stored interval covers the write's last point. Every queued
			// segment keeps `end` above the domain minimum, so the probe
			// cannot underflow.
			let last = end.down().unwrap();
			let covering = self
				.inner
				.get_key_value(covering_comp(last))
				.map(|(key, _)| key)
				.copied();
			if let Some(covering) = covering {
				let old = self.inner.remove(covering_comp(last)).unwrap();
				let resolved = (self.policy)(old.clone(), value.clone());

				// `covering.start > start`, otherwise the probe at `start`
				// would have matched above.
				if resolved == old {
					self.insert_piece(covering, resolved);
				} else {
					self.insert_piece(ie(covering.start, end), resolved);
					if end < covering.end {
						self.insert_piece(ie(end, covering.end), old);
					}
				}

				pending.push((start, covering.start));
				continue;
			}

			// Neither edge of the write touches a stored interval: look for
			// the first stored interval past `start`.
			let next = self
				.inner
				.lower_bound(covering_comp(start), SearchBoundCustom::Included)
				.key()
				.copied();

			match next {
				Some(next) if next.start < end => {
					// Insert the disjoint prefix, then queue the remainder
					// so it merges into `next` through the covering case.
					self.insert_piece(ie(start, next.start), value.clone());
					pending.push((next.start, end));
				}
				_ => {
					self.insert_piece(ie(start, end), value.clone());
				}
			}
		}

		Ok(())
	}
}

impl<I, V, F> IntervalMap<I, V, F>
where
	I: Endpoint,
{
	/// Returns a reference to the value of the stored interval covering
	/// the given point, if any.
	///
	/// # Examples
	/// ```
	/// use spanfold::IntervalMap;
	///
	/// let mut map = IntervalMap::new();
	///
	/// map.update(1, 4, false).unwrap();
	/// map.update(4, 8, true).unwrap();
	///
	/// assert_eq!(map.get_at_point(3), Some(&false));
	/// assert_eq!(map.get_at_point(4), Some(&true));
	/// assert_eq!(map.get_at_point(8), None);
	/// ```
	pub fn get_at_point(&self, point: I) -> Option<&V> {
		self.inner
			.get_key_value(covering_comp(point))
			.map(|(_, value)| value)
	}

	/// Returns `true` if some stored interval covers the given point.
	///
	/// # Examples
	/// ```
	/// use spanfold::IntervalMap;
	///
	/// let mut map = IntervalMap::new();
	///
	/// map.update(1, 4, false).unwrap();
	///
	/// assert_eq!(map.contains_point(1), true);
	/// assert_eq!(map.contains_point(4), false);
	/// ```
	pub fn contains_point(&self, point: I) -> bool {
		self.get_at_point(point).is_some()
	}

	/// Returns `true` if the given interval intersects any stored
	/// interval.
	///
	/// Only the first stored interval ending after `interval.start` needs
	/// checking: it intersects exactly when it starts before
	/// `interval.end`.
	///
	/// # Errors
	///
	/// Fails with [`RangeError::InvalidRange`] if the given interval is
	/// invalid.
	///
	/// # Examples
	/// ```
	/// use spanfold::interval::ie;
	/// use spanfold::{IntervalMap, RangeError};
	///
	/// let mut map = IntervalMap::new();
	///
	/// map.update(1, 5, ()).unwrap();
	/// map.update(10, 15, ()).unwrap();
	///
	/// assert_eq!(map.intersects(ie(4, 12)), Ok(true));
	/// assert_eq!(map.intersects(ie(5, 10)), Ok(false));
	/// assert_eq!(map.intersects(ie(5, 5)), Err(RangeError::InvalidRange));
	/// ```
	pub fn intersects(&self, interval: Interval<I>) -> Result<bool, RangeError> {
		if !interval.is_valid() {
			return Err(RangeError::InvalidRange);
		}

		let next = self
			.inner
			.lower_bound(covering_comp(interval.start), SearchBoundCustom::Included);

		Ok(next.key().is_some_and(|stored| stored.start < interval.end))
	}

	/// Merges every pair of stored neighbours that are exactly adjacent
	/// and hold equal values, leaving the minimal representation of the
	/// same point-wise mapping.
	///
	/// Idempotent: running it twice leaves the entries of the first run.
	///
	/// # Examples
	/// ```
	/// use spanfold::IntervalMap;
	///
	/// let mut map = IntervalMap::new();
	///
	/// map.update(0, 4, 1).unwrap();
	/// map.update(4, 8, 1).unwrap();
	/// assert_eq!(map.len(), 2);
	///
	/// map.defragment();
	/// assert_eq!(map.len(), 1);
	/// ```
	pub fn defragment(&mut self)
	where
		V: Eq,
	{
		let merged = std::mem::take(&mut self.inner).into_iter().coalesce(
			|(left, left_value), (right, right_value)| {
				if left.end == right.start && left_value == right_value {
					Ok((ie(left.start, right.end), left_value))
				} else {
					Err(((left, left_value), (right, right_value)))
				}
			},
		);

		for (interval, value) in merged {
			self.insert_piece(interval, value);
		}

		debug_assert!(self.no_fragmentation());
	}

	/// No two stored neighbours are both index-adjacent and value-equal.
	fn no_fragmentation(&self) -> bool
	where
		V: Eq,
	{
		self.inner.iter().tuple_windows().all(
			|((left, left_value), (right, right_value))| {
				left.end != right.start || left_value != right_value
			},
		)
	}

	/// Inserts an interval known to be disjoint from every stored one.
	pub(crate) fn insert_piece(&mut self, interval: Interval<I>, value: V) {
		self.inner.insert(interval, value, start_comp());
	}
}

impl<I, V, F> IntervalMap<I, V, F> {
	/// Returns the number of intervals in the map.
	///
	/// # Examples
	/// ```
	/// use spanfold::IntervalMap;
	///
	/// let mut map = IntervalMap::new();
	///
	/// assert_eq!(map.len(), 0);
	/// map.update(0, 1, false).unwrap();
	/// assert_eq!(map.len(), 1);
	/// ```
	pub fn len(&self) -> usize {
		self.inner.len()
	}

	/// Returns `true` if the map contains no intervals.
	///
	/// # Examples
	/// ```
	/// use spanfold::IntervalMap;
	///
	/// let mut map = IntervalMap::new();
	///
	/// assert_eq!(map.is_empty(), true);
	/// map.update(0, 1, false).unwrap();
	/// assert_eq!(map.is_empty(), false);
	/// ```
	pub fn is_empty(&self) -> bool {
		self.inner.is_empty()
	}

	/// Returns an iterator over every entry in the map in ascending order,
	/// reflecting the current fragmentation state.
	///
	/// # Examples
	/// ```
	/// use spanfold::IntervalMap;
	///
	/// let mut map = IntervalMap::new();
	///
	/// map.update(1, 4, false).unwrap();
	/// map.update(8, 10, true).unwrap();
	///
	/// let entries = map
	/// 	.iter()
	/// 	.map(|(iv, &v)| (iv.start, iv.end, v))
	/// 	.collect::<Vec<_>>();
	/// assert_eq!(entries, [(1, 4, false), (8, 10, true)]);
	/// ```
	pub fn iter(
		&self,
	) -> impl DoubleEndedIterator<Item = (&Interval<I>, &V)> {
		self.inner.iter()
	}

	/// Returns the first entry in the map, if any.
	pub fn first_key_value(&self) -> Option<(&Interval<I>, &V)> {
		self.inner.first_key_value()
	}

	/// Returns the last entry in the map, if any.
	pub fn last_key_value(&self) -> Option<(&Interval<I>, &V)> {
		self.inner.last_key_value()
	}
}

// Trait Impls ==========================

impl<I, V, F> IntoIterator for IntervalMap<I, V, F> {
	type Item = (Interval<I>, V);
	type IntoIter = IntoIter<I, V>;
	fn into_iter(self) -> Self::IntoIter {
		IntoIter {
			inner: self.inner.into_iter(),
		}
	}
}

/// An owning iterator over the entries of an [`IntervalMap`].
///
/// This `struct` is created by the [`into_iter`] method on
/// [`IntervalMap`] (provided by the [`IntoIterator`] trait). See its
/// documentation for more.
///
/// [`into_iter`]: IntoIterator::into_iter
/// [`IntoIterator`]: core::iter::IntoIterator
pub struct IntoIter<I, V> {
	inner: BTreeMapIntoIter<Interval<I>, V>,
}
impl<I, V> Iterator for IntoIter<I, V> {
	type Item = (Interval<I>, V);
	fn next(&mut self) -> Option<Self::Item> {
		self.inner.next()
	}
}

// Manual impls so that closure policies do not poison the container: the
// policy takes no part in equality or debug output.

impl<I, V, F> fmt::Debug for IntervalMap<I, V, F>
where
	I: fmt::Debug,
	V: fmt::Debug,
{
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_map().entries(self.inner.iter()).finish()
	}
}

impl<I, V, F> PartialEq for IntervalMap<I, V, F>
where
	I: PartialEq,
	V: PartialEq,
{
	fn eq(&self, other: &Self) -> bool {
		self.inner == other.inner
	}
}

impl<I, V, F> Eq for IntervalMap<I, V, F>
where
	I: Eq,
	V: Eq,
{
}

impl<I, V, F> Clone for IntervalMap<I, V, F>
where
	I: Clone,
	V: Clone,
	F: Clone,
{
	fn clone(&self) -> Self {
		IntervalMap {
			inner: self.inner.clone(),
			policy: self.policy.clone(),
		}
	}
}

#[cfg(feature = "serde")]
mod serde {
	use std::fmt;
	use std::marker::PhantomData;

	use serde::de::{SeqAccess, Visitor};
	use serde::ser::SerializeSeq;
	use serde::{Deserialize, Deserializer, Serialize, Serializer};

	use crate::{Endpoint, Interval, IntervalMap};

	impl<I, V, F> Serialize for IntervalMap<I, V, F>
	where
		I: Serialize,
		V: Serialize,
	{
		fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
		where
			S: Serializer,
		{
			let mut seq = serializer.serialize_seq(Some(self.len()))?;
			for (interval, value) in self.iter() {
				seq.serialize_element(&(interval, value))?;
			}
			seq.end()
		}
	}

	// Only the default-policy map can be deserialized: arbitrary policy
	// closures cannot be materialized from serialized data.
	impl<'de, I, V> Deserialize<'de> for IntervalMap<I, V>
	where
		I: Endpoint + Deserialize<'de>,
		V: Deserialize<'de>,
	{
		fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
		where
			D: Deserializer<'de>,
		{
			deserializer.deserialize_seq(IntervalMapVisitor {
				i: PhantomData,
				v: PhantomData,
			})
		}
	}

	struct IntervalMapVisitor<I, V> {
		i: PhantomData<I>,
		v: PhantomData<V>,
	}

	impl<'de, I, V> Visitor<'de> for IntervalMapVisitor<I, V>
	where
		I: Endpoint + Deserialize<'de>,
		V: Deserialize<'de>,
	{
		type Value = IntervalMap<I, V>;

		fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
			formatter.write_str("an IntervalMap")
		}

		fn visit_seq<A>(self, mut access: A) -> Result<Self::Value, A::Error>
		where
			A: SeqAccess<'de>,
		{
			let mut map = IntervalMap::new();
			while let Some((interval, value)) =
				access.next_element::<(Interval<I>, V)>()?
			{
				if !interval.is_valid() {
					return Err(serde::de::Error::custom("invalid interval"));
				}
				if map
					.last_key_value()
					.is_some_and(|(last, _)| last.end > interval.start)
				{
					return Err(serde::de::Error::custom(
						"intervals out of order or overlapping",
					));
				}
				map.insert_piece(interval, value);
			}
			Ok(map)
		}
	}
}

#[cfg(test)]
mod tests {
	use pretty_assertions::assert_eq;

	use super::*;
	use crate::policy::maximum;

	// Interval grid the exhaustive tests draw from, and the point domain
	// the model covers.
	const POINTS: &[i8] = &[0, 2, 4, 6, 8];
	const DOMAIN: &[i8] = &[0, 1, 2, 3, 4, 5, 6, 7, 8, 9];

	fn entries<V, F>(map: &IntervalMap<i8, V, F>) -> Vec<(i8, i8, V)>
	where
		V: Copy,
	{
		map.iter().map(|(iv, &v)| (iv.start, iv.end, v)).collect()
	}

	fn assert_disjoint_and_sorted<V, F>(map: &IntervalMap<i8, V, F>) {
		for (left, right) in map.iter().map(|(iv, _)| iv).tuple_windows() {
			assert!(left.start < left.end);
			assert!(left.end <= right.start);
			assert!(right.start < right.end);
		}
	}

	#[test]
	fn skyline_scenario_with_maximum_policy() {
		let mut map = IntervalMap::with_policy(maximum);
		let buildings =
			[(2, 9, 10), (3, 7, 15), (5, 12, 12), (15, 20, 10), (19, 24, 8)];
		for (start, end, height) in buildings {
			map.update(start, end, height).unwrap();
		}

		map.defragment();

		assert_eq!(
			entries(&map),
			[
				(2, 3, 10),
				(3, 7, 15),
				(7, 12, 12),
				(15, 20, 10),
				(20, 24, 8)
			]
		);
	}

	#[test]
	fn overwrite_swallows_older_entries() {
		let mut map = IntervalMap::new();
		map.update(5, 15, 10).unwrap();
		map.update(0, 20, 5).unwrap();

		map.defragment();

		assert_eq!(entries(&map), [(0, 20, 5)]);
	}

	#[test]
	fn update_rejects_empty_and_inverted_ranges() {
		let mut map = IntervalMap::new();
		map.update(0, 4, 1).unwrap();
		let before = entries(&map);

		assert_eq!(map.update(5, 5, 2), Err(RangeError::InvalidRange));
		assert_eq!(map.update(8, 4, 2), Err(RangeError::InvalidRange));
		assert_eq!(entries(&map), before);
	}

	#[test]
	fn update_rejects_an_end_at_the_domain_minimum() {
		let mut map = IntervalMap::new();

		assert_eq!(
			map.update(-5, i8::MIN, 1),
			Err(RangeError::RangeOverflow)
		);
		assert_eq!(map.is_empty(), true);
	}

	#[test]
	fn overflow_takes_precedence_over_invalid_range() {
		// `start >= end` holds too, but the unprobeable end must win.
		let mut map = IntervalMap::new();

		assert_eq!(
			map.update(0, i8::MIN, 1),
			Err(RangeError::RangeOverflow)
		);
	}

	#[test]
	fn writes_may_start_at_the_domain_minimum() {
		let mut map = IntervalMap::new();
		map.update(i8::MIN, 0, 7).unwrap();

		assert_eq!(map.get_at_point(i8::MIN), Some(&7));
		assert_eq!(map.get_at_point(-1), Some(&7));
		assert_eq!(map.get_at_point(0), None);
	}

	#[test]
	fn policy_receives_old_then_new() {
		// A deliberately non-commutative policy that encodes call order.
		let mut map = IntervalMap::with_policy(|old: i32, new| old * 10 + new);
		map.update(0, 10, 1).unwrap();
		map.update(5, 15, 2).unwrap();

		assert_eq!(entries(&map), [(0, 5, 1), (5, 10, 12), (10, 15, 2)]);
	}

	#[test]
	fn overwrite_updates_are_idempotent() {
		let mut once = IntervalMap::new();
		let mut twice = IntervalMap::new();
		for map in [&mut once, &mut twice] {
			map.update(2, 9, 10).unwrap();
			map.update(5, 12, 3).unwrap();
		}
		twice.update(5, 12, 3).unwrap();

		for &x in DOMAIN {
			assert_eq!(once.get_at_point(x), twice.get_at_point(x));
		}

		once.defragment();
		twice.defragment();
		assert_eq!(entries(&once), entries(&twice));
	}

	#[test]
	fn defragment_is_idempotent_and_preserves_the_mapping() {
		let mut map = IntervalMap::with_policy(maximum);
		for (start, end, height) in
			[(2, 9, 10), (3, 7, 15), (5, 12, 12), (15, 20, 10), (19, 24, 8)]
		{
			map.update(start, end, height).unwrap();
		}

		let queries_before: Vec<_> =
			(-1..26).map(|x| map.get_at_point(x).copied()).collect();

		map.defragment();
		let first_pass = entries(&map);
		let queries_after: Vec<_> =
			(-1..26).map(|x| map.get_at_point(x).copied()).collect();

		assert_eq!(queries_before, queries_after);

		map.defragment();
		assert_eq!(entries(&map), first_pass);
	}

	#[test]
	fn replaying_entries_reproduces_the_map() {
		let mut map = IntervalMap::with_policy(maximum);
		for (start, end, height) in
			[(2, 9, 10), (3, 7, 15), (5, 12, 12), (15, 20, 10), (19, 24, 8)]
		{
			map.update(start, end, height).unwrap();
		}

		// Replay the current entries as overwrite updates into a fresh map.
		let mut replayed = IntervalMap::new();
		for (start, end, height) in entries(&map) {
			replayed.update(start, end, height).unwrap();
		}

		map.defragment();
		replayed.defragment();
		assert_eq!(entries(&map), entries(&replayed));
	}

	#[test]
	fn a_single_write_can_cross_many_stored_intervals() {
		let mut map = IntervalMap::with_policy(maximum);
		for i in 0..50 {
			map.update(2 * i, 2 * i + 1, 9_i64).unwrap();
		}

		// Fill the gaps with a smaller value, then flatten everything.
		map.update(0, 100, 5).unwrap();
		map.defragment();
		for x in 0..100 {
			let expected = if x % 2 == 0 { 9 } else { 5 };
			assert_eq!(map.get_at_point(x), Some(&expected));
		}

		map.update(0, 100, 9).unwrap();
		map.defragment();
		assert_eq!(map.len(), 1);
		assert_eq!(map.first_key_value().map(|(iv, &v)| (iv.start, iv.end, v)), Some((0, 100, 9)));
	}

	#[test]
	fn point_queries_on_an_empty_map_are_absent() {
		let map: IntervalMap<i8, u8> = IntervalMap::new();

		assert_eq!(map.get_at_point(0), None);
		assert_eq!(map.contains_point(0), false);
	}

	#[test]
	fn intersects_checks_both_edges() {
		let mut map = IntervalMap::new();
		for (start, end) in [(1, 5), (10, 15), (20, 25)] {
			map.update(start, end, ()).unwrap();
		}

		// overlaps two stored intervals
		assert_eq!(map.intersects(ie(4, 12)), Ok(true));
		// fits exactly in the gap between two stored intervals
		assert_eq!(map.intersects(ie(5, 10)), Ok(false));
		// right edge only
		assert_eq!(map.intersects(ie(0, 2)), Ok(true));
		// left edge only
		assert_eq!(map.intersects(ie(24, 30)), Ok(true));
		// beyond the last stored interval
		assert_eq!(map.intersects(ie(25, 30)), Ok(false));

		assert_eq!(map.intersects(ie(3, 3)), Err(RangeError::InvalidRange));
		assert_eq!(map.intersects(ie(9, 2)), Err(RangeError::InvalidRange));
	}

	// The point-wise model: an array over DOMAIN holding the policy fold
	// of every update whose range contained each point.
	fn model_update(
		model: &mut [Option<i8>],
		start: i8,
		end: i8,
		value: i8,
		mut policy: impl FnMut(i8, i8) -> i8,
	) {
		for x in start..end {
			let slot = &mut model[x as usize];
			*slot = Some(match *slot {
				Some(old) => policy(old, value),
				None => value,
			});
		}
	}

	fn all_test_intervals() -> Vec<(i8, i8)> {
		let mut output = Vec::new();
		for &i in POINTS {
			for &j in POINTS {
				if i < j {
					output.push((i, j));
				}
			}
		}
		output
	}

	#[test]
	fn update_matches_the_point_wise_model() {
		let intervals = all_test_intervals();
		let values: [i8; 3] = [1, 3, 2];

		for &a in &intervals {
			for &b in &intervals {
				for &c in &intervals {
					for policy in
						[crate::policy::overwrite as fn(i8, i8) -> i8, maximum]
					{
						let mut map = IntervalMap::with_policy(policy);
						let mut model = [None; 10];

						for (&(start, end), &value) in
							[a, b, c].iter().zip(values.iter())
						{
							map.update(start, end, value).unwrap();
							model_update(&mut model, start, end, value, policy);
						}

						assert_disjoint_and_sorted(&map);
						for &x in DOMAIN {
							assert_eq!(
								map.get_at_point(x).copied(),
								model[x as usize],
								"diverged at {x} after {a:?} {b:?} {c:?}",
							);
						}

						map.defragment();
						assert_disjoint_and_sorted(&map);
						for &x in DOMAIN {
							assert_eq!(
								map.get_at_point(x).copied(),
								model[x as usize],
								"defragment changed {x} after {a:?} {b:?} {c:?}",
							);
						}
					}
				}
			}
		}
	}
}
