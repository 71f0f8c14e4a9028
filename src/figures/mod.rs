pub mod comparison;
pub mod table;
pub mod timeseries;

/// Fit a list of labels to `count` entries: extra entries are dropped and
/// missing ones are empty. With `repeat_single`, a one-entry list is used
/// for every position instead.
pub(crate) fn pad_labels(labels: &[String], count: usize, repeat_single: bool) -> Vec<String> {
    if repeat_single && labels.len() == 1 {
        return vec![labels[0].clone(); count];
    }
    (0..count)
        .map(|i| labels.get(i).cloned().unwrap_or_default())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pads_truncates_and_repeats() {
        let one = vec!["a".to_string()];
        assert_eq!(pad_labels(&one, 3, true), vec!["a", "a", "a"]);
        assert_eq!(pad_labels(&one, 3, false), vec!["a", "", ""]);
        let many: Vec<String> = ["a", "b", "c"].iter().map(|s| s.to_string()).collect();
        assert_eq!(pad_labels(&many, 2, false), vec!["a", "b"]);
        assert!(pad_labels(&[], 2, true).iter().all(String::is_empty));
    }
}
