use std::hash::Hash;

use serde::{Deserialize, Serialize};

/// A key that orders the points of a series and can be projected onto a
/// plot axis.
pub trait IndexKey: Ord + Clone + Hash {
    /// Position of this key on a numeric plot axis.
    fn to_axis(&self) -> f64;

    /// Whether axis positions are Unix timestamps (seconds) and should be
    /// labelled as dates.
    fn is_datetime() -> bool {
        false
    }
}

macro_rules! impl_integer_key {
    ($($t:ty),*) => {
        $(
            impl IndexKey for $t {
                fn to_axis(&self) -> f64 {
                    *self as f64
                }
            }
        )*
    };
}

impl_integer_key!(i32, i64, u32, u64, usize);

/// A named, ordered sequence of `(index, value)` observations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NamedSeries<K> {
    pub name: String,
    pub points: Vec<(K, f64)>,
}

impl<K: IndexKey> NamedSeries<K> {
    pub fn new(name: impl Into<String>, points: Vec<(K, f64)>) -> Self {
        Self {
            name: name.into(),
            points,
        }
    }

    /// Build a series from parallel index and value vectors. Extra entries
    /// in the longer vector are ignored.
    pub fn from_parts(name: impl Into<String>, index: Vec<K>, values: Vec<f64>) -> Self {
        Self::new(name, index.into_iter().zip(values).collect())
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn index(&self) -> impl Iterator<Item = &K> + '_ {
        self.points.iter().map(|(k, _)| k)
    }

    pub fn values(&self) -> Vec<f64> {
        self.points.iter().map(|(_, v)| *v).collect()
    }

    /// Axis positions and values, ready for a line item.
    pub fn axis_points(&self) -> Vec<[f64; 2]> {
        self.points.iter().map(|(k, v)| [k.to_axis(), *v]).collect()
    }

    /// Largest finite value, NaN when there is none.
    pub fn max(&self) -> f64 {
        self.points
            .iter()
            .map(|(_, v)| *v)
            .filter(|v| v.is_finite())
            .fold(f64::NAN, f64::max)
    }

    /// Smallest finite value, NaN when there is none.
    pub fn min(&self) -> f64 {
        self.points
            .iter()
            .map(|(_, v)| *v)
            .filter(|v| v.is_finite())
            .fold(f64::NAN, f64::min)
    }
}

/// An inclusive x-axis window given in index keys.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Window<K> {
    pub start: K,
    pub end: K,
}

impl<K: IndexKey> Window<K> {
    pub fn new(start: K, end: K) -> Self {
        Self { start, end }
    }

    pub fn to_axis(&self) -> (f64, f64) {
        (self.start.to_axis(), self.end.to_axis())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn min_max_skip_nan() {
        let s = NamedSeries::from_parts("s", vec![1i64, 2, 3], vec![4.0, f64::NAN, -1.0]);
        assert_eq!(s.max(), 4.0);
        assert_eq!(s.min(), -1.0);
    }

    #[test]
    fn empty_series_has_nan_bounds() {
        let s: NamedSeries<i64> = NamedSeries::new("empty", Vec::new());
        assert!(s.max().is_nan());
        assert!(s.min().is_nan());
        assert!(s.is_empty());
    }

    #[test]
    fn axis_points_project_keys() {
        let s = NamedSeries::from_parts("s", vec![10u32, 20], vec![1.0, 2.0]);
        assert_eq!(s.axis_points(), vec![[10.0, 1.0], [20.0, 2.0]]);
    }
}
