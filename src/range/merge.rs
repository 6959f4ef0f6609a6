use super::KeyRange;

pub struct MergedRanges<K, I: IntoIterator<Item = KeyRange<K>>> {
    values: I,
    last: Option<KeyRange<K>>,
}

/// Sorts `ranges` by start and returns an iterator over the coalesced arcs.
/// Arcs that overlap or touch end to start are joined.
pub fn merge_ranges<K, I>(
    ranges: I,
) -> MergedRanges<K, <Vec<KeyRange<K>> as IntoIterator>::IntoIter>
where
    K: PartialOrd + Ord + Clone,
    I: Into<Vec<KeyRange<K>>>,
{
    let mut ranges = ranges.into();
    ranges.sort_by(|a, b| a.start.cmp(&b.start));

    merge_ranges_sorted(ranges)
}

/// Same as [`merge_ranges`], for input already sorted by `start` ascending.
pub fn merge_ranges_sorted<K, T>(ranges: T) -> MergedRanges<K, <T as IntoIterator>::IntoIter>
where
    K: PartialOrd + Ord + Clone,
    T: IntoIterator<Item = KeyRange<K>>,
{
    let mut values = ranges.into_iter();
    let last = values.next();

    MergedRanges { values, last }
}

impl<K, I> Iterator for MergedRanges<K, I>
where
    K: PartialOrd + Ord + Clone,
    I: Iterator<Item = KeyRange<K>>,
{
    type Item = KeyRange<K>;

    fn next(&mut self) -> Option<KeyRange<K>> {
        let mut last = self.last.take()?;

        for mut next in &mut self.values {
            match (last.is_wrapping(), next.is_wrapping()) {
                // A plain arc sorted after a wrapping one lies inside it.
                (true, false) => {}
                (true, true) => last.extend_end(&next),
                (false, true) if last.end >= next.start => {
                    next.extend_start(&last);
                    last = next;
                }
                (false, false) if last.end >= next.start => last.extend_end(&next),
                _ => {
                    self.last = Some(next);
                    return Some(last);
                }
            }
        }

        Some(last)
    }
}

#[cfg(test)]
mod tests {
    use {super::*, std::ops::Range};

    fn r(range: Range<u32>) -> KeyRange<u32> {
        range.into()
    }

    #[test]
    fn adjacent_arcs_are_joined() {
        let arcs = [r(40..70), r(10..20), r(20..40), r(90..95)];
        let merged = merge_ranges(arcs).collect::<Vec<_>>();

        assert_eq!(merged, vec![r(10..70), r(90..95)]);
    }

    #[test]
    fn overlapping_arcs_are_joined() {
        let arcs = [r(5..9), r(1..6), r(12..14), r(0..30)];
        let merged = merge_ranges(arcs).collect::<Vec<_>>();

        assert_eq!(merged, vec![r(0..30)]);
    }

    #[test]
    fn arcs_through_zero() {
        let arcs = [r(950..5), r(10..20), r(900..10), r(920..930)];
        let merged = merge_ranges(arcs).collect::<Vec<_>>();

        // The wrapping arc swallows the arcs starting inside it, but is not
        // joined with `10..20` which sorts ahead of it.
        assert_eq!(merged, vec![r(10..20), r(900..10)]);
    }

    #[test]
    fn empty_input() {
        let merged = merge_ranges(Vec::<KeyRange<u32>>::new()).collect::<Vec<_>>();
        assert!(merged.is_empty());
    }
}
