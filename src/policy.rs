//! A module containing the built-in conflict resolution policies.
//!
//! A policy is any `FnMut(V, V) -> V`, invoked as `policy(old, new)` on
//! exactly the sub-range where a range write overlaps a stored entry. The
//! two built-ins below are plain generic functions, so once instantiated
//! they are two values of the one function pointer type `fn(V, V) -> V`,
//! which is also [`IntervalMap`]'s default policy type. Arbitrary policy
//! functions, including non-commutative ones, can be supplied through
//! [`IntervalMap::with_policy`].
//!
//! [`IntervalMap`]: crate::IntervalMap
//! [`IntervalMap::with_policy`]: crate::IntervalMap::with_policy

/// The conflict policy that discards the stored value and keeps the
/// incoming one.
///
/// This is the policy used by [`IntervalMap::new`](crate::IntervalMap::new).
///
/// # Examples
/// ```
/// use spanfold::IntervalMap;
///
/// let mut map = IntervalMap::new();
///
/// map.update(0, 10, 1).unwrap();
/// map.update(5, 15, 2).unwrap();
///
/// assert_eq!(map.get_at_point(4), Some(&1));
/// assert_eq!(map.get_at_point(5), Some(&2));
/// ```
pub fn overwrite<V>(_old: V, new: V) -> V {
	new
}

/// The conflict policy that keeps the larger of the stored and incoming
/// values.
///
/// # Examples
/// ```
/// use spanfold::policy::maximum;
/// use spanfold::IntervalMap;
///
/// let mut map = IntervalMap::with_policy(maximum);
///
/// map.update(0, 10, 7).unwrap();
/// map.update(5, 15, 2).unwrap();
///
/// assert_eq!(map.get_at_point(6), Some(&7));
/// assert_eq!(map.get_at_point(12), Some(&2));
/// ```
pub fn maximum<V>(old: V, new: V) -> V
where
	V: Ord,
{
	old.max(new)
}

#[cfg(test)]
mod tests {
	use pretty_assertions::assert_eq;

	use super::*;

	#[test]
	fn built_ins_share_one_function_type() {
		let policies: [fn(u8, u8) -> u8; 2] = [overwrite, maximum];

		assert_eq!(policies[0](3, 1), 1);
		assert_eq!(policies[1](3, 1), 3);
	}
}
