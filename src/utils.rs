//! Comparator closures over stored intervals.
//!
//! These are the two forms of the transparent point/interval ordering the
//! store is searched with: a point compares equal to the unique stored
//! interval covering it, and stored intervals compare by `start` (a total
//! order, since stored intervals never overlap).

use std::cmp::Ordering;

use crate::{Endpoint, Interval};

/// Where `point` falls relative to `interval`; `Equal` means covered.
pub(crate) fn cmp_point_with_interval<I>(
	point: I,
	interval: &Interval<I>,
) -> Ordering
where
	I: Endpoint,
{
	if point < interval.start {
		Ordering::Less
	} else if point >= interval.end {
		Ordering::Greater
	} else {
		Ordering::Equal
	}
}

/// The point-vs-interval search comparator: finds the stored interval
/// covering `point`.
pub(crate) fn covering_comp<I>(point: I) -> impl FnMut(&Interval<I>) -> Ordering
where
	I: Endpoint,
{
	move |stored: &Interval<I>| cmp_point_with_interval(point, stored)
}

/// The interval-vs-interval insert comparator: orders stored intervals by
/// their `start` points.
pub(crate) fn start_comp<I>(
) -> impl FnMut(&Interval<I>, &Interval<I>) -> Ordering
where
	I: Endpoint,
{
	|stored: &Interval<I>, new: &Interval<I>| new.start.cmp(&stored.start)
}
