//! A module containing [`Interval`] and its constructor shorthand.

/// A half-open interval: `start` is included, `end` is excluded.
///
/// An interval is only valid if it contains at least one point of the
/// underlying domain, that is if `start < end`. The containers in this
/// crate never store invalid intervals.
///
/// # Examples
/// ```
/// use spanfold::interval::ie;
///
/// assert_eq!(ie(4, 8).contains(4), true);
/// assert_eq!(ie(4, 8).contains(7), true);
/// assert_eq!(ie(4, 8).contains(8), false);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Interval<I> {
	/// The start of the interval, inclusive.
	pub start: I,
	/// The end of the interval, exclusive.
	pub end: I,
}

impl<I> Interval<I>
where
	I: Ord + Copy,
{
	/// Returns `true` if the interval contains at least one point.
	pub fn is_valid(&self) -> bool {
		self.start < self.end
	}

	/// Returns `true` if the interval contains the given point.
	pub fn contains(&self, point: I) -> bool {
		self.start <= point && point < self.end
	}
}

/// A shorthand constructor for an inclusive-start exclusive-end
/// [`Interval`].
///
/// # Examples
/// ```
/// use spanfold::interval::ie;
/// use spanfold::Interval;
///
/// assert_eq!(ie(4, 8), Interval { start: 4, end: 8 });
/// ```
pub fn ie<I>(start: I, end: I) -> Interval<I> {
	Interval { start, end }
}

#[cfg(test)]
mod tests {
	use pretty_assertions::assert_eq;

	use super::*;

	#[test]
	fn validity_requires_at_least_one_point() {
		assert_eq!(ie(4, 8).is_valid(), true);
		assert_eq!(ie(4, 5).is_valid(), true);
		assert_eq!(ie(4, 4).is_valid(), false);
		assert_eq!(ie(8, 4).is_valid(), false);
	}

	#[test]
	fn contains_is_half_open() {
		let interval = ie(-2, 3);

		assert_eq!(interval.contains(-3), false);
		assert_eq!(interval.contains(-2), true);
		assert_eq!(interval.contains(0), true);
		assert_eq!(interval.contains(2), true);
		assert_eq!(interval.contains(3), false);
	}
}
