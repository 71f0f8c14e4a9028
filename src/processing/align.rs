use std::collections::{HashMap, HashSet};

use crate::state::series::{IndexKey, NamedSeries};

/// Restrict every series to the keys present in all of them.
///
/// The result follows the key order of the first series. When a key occurs
/// more than once in a series only its first occurrence is used. Series
/// without any common key come back empty.
pub fn align_all<K: IndexKey>(series: &[NamedSeries<K>]) -> Vec<NamedSeries<K>> {
    let Some(first) = series.first() else {
        return Vec::new();
    };

    // First value per key for every series after the first.
    let lookups: Vec<HashMap<&K, f64>> = series[1..]
        .iter()
        .map(|s| {
            let mut map = HashMap::with_capacity(s.len());
            for (k, v) in &s.points {
                map.entry(k).or_insert(*v);
            }
            map
        })
        .collect();

    let mut seen: HashSet<&K> = HashSet::with_capacity(first.len());
    let mut aligned: Vec<Vec<(K, f64)>> = vec![Vec::new(); series.len()];

    for (k, v) in &first.points {
        if !seen.insert(k) {
            continue;
        }
        let others: Option<Vec<f64>> = lookups.iter().map(|m| m.get(k).copied()).collect();
        if let Some(others) = others {
            aligned[0].push((k.clone(), *v));
            for (slot, value) in aligned[1..].iter_mut().zip(others) {
                slot.push((k.clone(), value));
            }
        }
    }

    let matched = aligned[0].len();
    if matched == 0 && series.iter().all(|s| !s.is_empty()) {
        tracing::warn!(
            series = series.len(),
            "aligned series share no index values; statistics will be undefined"
        );
    } else {
        tracing::debug!(
            series = series.len(),
            matched,
            first_len = first.len(),
            "aligned series on common index"
        );
    }

    series
        .iter()
        .zip(aligned)
        .map(|(s, points)| NamedSeries::new(s.name.clone(), points))
        .collect()
}

/// Restrict two series to their common index.
pub fn align_pair<K: IndexKey>(
    a: &NamedSeries<K>,
    b: &NamedSeries<K>,
) -> (NamedSeries<K>, NamedSeries<K>) {
    let mut aligned = align_all(&[a.clone(), b.clone()]).into_iter();
    match (aligned.next(), aligned.next()) {
        (Some(a), Some(b)) => (a, b),
        _ => (
            NamedSeries::new(a.name.clone(), Vec::new()),
            NamedSeries::new(b.name.clone(), Vec::new()),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn series(name: &str, keys: &[i64], values: &[f64]) -> NamedSeries<i64> {
        NamedSeries::from_parts(name, keys.to_vec(), values.to_vec())
    }

    #[test]
    fn pair_keeps_only_overlap() {
        let a = series("obs", &[1, 2, 3, 4], &[10.0, 20.0, 30.0, 40.0]);
        let b = series("pred", &[3, 4, 5], &[31.0, 41.0, 51.0]);
        let (a, b) = align_pair(&a, &b);
        assert_eq!(a.points, vec![(3, 30.0), (4, 40.0)]);
        assert_eq!(b.points, vec![(3, 31.0), (4, 41.0)]);
        assert_eq!(a.name, "obs");
        assert_eq!(b.name, "pred");
    }

    #[test]
    fn order_follows_first_series() {
        let a = series("a", &[3, 1, 2], &[3.0, 1.0, 2.0]);
        let b = series("b", &[1, 2, 3], &[10.0, 20.0, 30.0]);
        let (a, b) = align_pair(&a, &b);
        let ka: Vec<i64> = a.index().copied().collect();
        let kb: Vec<i64> = b.index().copied().collect();
        assert_eq!(ka, vec![3, 1, 2]);
        assert_eq!(ka, kb);
        assert_eq!(b.values(), vec![30.0, 10.0, 20.0]);
    }

    #[test]
    fn duplicate_keys_use_first_occurrence() {
        let a = series("a", &[1, 1, 2], &[1.0, 9.0, 2.0]);
        let b = series("b", &[2, 1, 1], &[20.0, 10.0, 90.0]);
        let (a, b) = align_pair(&a, &b);
        assert_eq!(a.points, vec![(1, 1.0), (2, 2.0)]);
        assert_eq!(b.points, vec![(1, 10.0), (2, 20.0)]);
    }

    #[test]
    fn disjoint_series_align_to_empty() {
        let a = series("a", &[1, 2], &[1.0, 2.0]);
        let b = series("b", &[3, 4], &[3.0, 4.0]);
        let (a, b) = align_pair(&a, &b);
        assert!(a.is_empty());
        assert!(b.is_empty());
    }

    #[test]
    fn three_way_alignment() {
        let out = align_all(&[
            series("a", &[1, 2, 3, 4], &[1.0, 2.0, 3.0, 4.0]),
            series("b", &[2, 3, 4], &[2.0, 3.0, 4.0]),
            series("c", &[1, 3, 4], &[1.0, 3.0, 4.0]),
        ]);
        assert_eq!(out.len(), 3);
        for s in &out {
            assert_eq!(s.index().copied().collect::<Vec<_>>(), vec![3, 4]);
        }
    }
}
