//! A module containing the [`Endpoint`] trait and its impls for the
//! primitive integer datatypes.

/// The trait for types usable as interval end-points: totally ordered,
/// cheap to copy, and steppable down to a predecessor.
///
/// `down()` returns `None` exactly at the minimum value of the domain,
/// which is how [`IntervalMap::update`] detects that its internal `end - 1`
/// probe would underflow.
///
/// [`IntervalMap::update`]: crate::IntervalMap::update
pub trait Endpoint: Ord + Copy {
	/// The greatest value smaller than `self`, if one exists.
	fn down(self) -> Option<Self>;
}

macro_rules! impl_endpoint {
	() => {};
	($t:ident, $($rest:tt)*) => {
		impl Endpoint for $t {
			fn down(self) -> Option<Self> {
				self.checked_sub(1)
			}
		}

		impl_endpoint!($($rest)*);
	};
}

impl_endpoint!(u8, i8, u16, i16, u32, i32, u64, i64, u128, i128, usize, isize,);
