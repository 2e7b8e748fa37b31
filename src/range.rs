//! Score intervals.

/// An interval over scores, each bound inclusive or exclusive.
///
/// A range with `min > max`, or `min == max` and either bound exclusive, is
/// empty: queries over it return nothing and deletions remove nothing.
///
/// ```
/// use rankset::RangeSpec;
///
/// // 10 < score <= 20
/// let range = RangeSpec::inclusive(10, 20).exclude_min();
/// assert!(range.min_exclusive);
/// assert!(!range.max_exclusive);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct RangeSpec<S> {
    pub min: S,
    pub max: S,
    pub min_exclusive: bool,
    pub max_exclusive: bool,
}

impl<S> RangeSpec<S> {
    pub fn new(min: S, max: S, min_exclusive: bool, max_exclusive: bool) -> Self {
        RangeSpec {
            min,
            max,
            min_exclusive,
            max_exclusive,
        }
    }

    /// `min <= score <= max`.
    pub fn inclusive(min: S, max: S) -> Self {
        Self::new(min, max, false, false)
    }

    /// `min < score < max`.
    pub fn exclusive(min: S, max: S) -> Self {
        Self::new(min, max, true, true)
    }

    pub fn exclude_min(mut self) -> Self {
        self.min_exclusive = true;
        self
    }

    pub fn exclude_max(mut self) -> Self {
        self.max_exclusive = true;
        self
    }
}
