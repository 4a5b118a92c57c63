//! Suffix array construction for the Burrows-Wheeler transform.
//!
//! Input is a sequence of integer symbols whose last element is a sentinel: unique and
//! strictly smaller than every other symbol. Two algorithms are provided. A direct
//! comparison sort is fastest on small blocks; SA-IS (induced sorting) runs in linear
//! time and is used for everything else.
//!
use log::{debug, trace};

use crate::tools::options::SortAlgorithm;

/// Blocks shorter than this are sorted directly when the algorithm is Auto.
const SIMPLE_LIMIT: usize = 256;

const S: u32 = 1;
const LMS: u32 = 1;
const L: u32 = 0;

#[allow(clippy::upper_case_acronyms)]
/// LMS struct holds compressed L, S, and LMS type flags for every position of the data.
struct LMS {
    /// Bit oriented vec of LMS type element indices
    lms: Vec<u32>,
    /// Bit oriented vec of L and S type element indices
    ls: Vec<u32>,
    /// Position of the sentinel (the last element)
    last: usize,
    /// Count of LMS type elements
    lms_count: usize,
}

impl LMS {
    /// Classify every element of non-empty `data`.
    fn new(data: &[u32]) -> Self {
        /*
        A set bit in ls marks an S type element, a clear bit an L type. A set bit in lms
        marks an LMS element (an S type with an L type to its left). 32 flags fit in each
        u32, indexed by idx >> 5 and idx % 32.
        */
        let last = data.len() - 1;
        let mut lms = Self {
            lms: vec![L; data.len() / 32 + 1],
            ls: vec![L; data.len() / 32 + 1],
            last,
            lms_count: 0,
        };
        // The sentinel is an S type by definition
        lms.ls[last >> 5] |= S << (last % 32);

        // Walk backwards, comparing each element with the one to its right
        let mut current = S;
        for idx in (0..last).rev() {
            match data[idx].cmp(&data[idx + 1]) {
                std::cmp::Ordering::Less => {
                    lms.ls[idx >> 5] |= S << (idx % 32);
                    current = S;
                }
                // Equal elements inherit the type of their right neighbour
                std::cmp::Ordering::Equal => {
                    if current == S {
                        lms.ls[idx >> 5] |= S << (idx % 32);
                    }
                }
                // An L type followed by an S type makes the S type an LMS
                std::cmp::Ordering::Greater => {
                    if current == S {
                        lms.lms[(idx + 1) >> 5] |= LMS << ((idx + 1) % 32);
                    }
                    current = L;
                }
            }
        }
        lms.lms_count = lms.lms.iter().map(|el| el.count_ones()).sum::<u32>() as usize;
        lms
    }

    /// Checks if element at index is set (is an LMS element)
    fn is_lms(&self, idx: usize) -> bool {
        self.lms[idx >> 5] & (LMS << (idx % 32)) > 0
    }

    /// data element at idx is not set (is an L)
    fn is_l(&self, idx: usize) -> bool {
        self.ls[idx >> 5] & (S << (idx % 32)) == 0
    }

    /// data element at idx is set (is an S)
    fn is_s(&self, idx: usize) -> bool {
        !self.is_l(idx)
    }

    /// Test if the LMS substrings starting at a and b are equal (same symbols and types up
    /// to and including the next LMS element). Assumes a and b are LMS elements.
    fn equal_lms(&self, data: &[u32], a: usize, b: usize) -> bool {
        // The sentinel only equals itself
        if a == self.last || b == self.last {
            return a == b;
        }
        let mut k = 0;
        loop {
            let (x, y) = (a + k, b + k);
            // The sentinel is unique, so a mismatch is always found before either runs off the end
            if data[x] != data[y] || self.is_s(x) != self.is_s(y) {
                return false;
            }
            if k > 0 && (self.is_lms(x) || self.is_lms(y)) {
                return self.is_lms(x) && self.is_lms(y);
            }
            k += 1;
        }
    }
}

//-- Counts for Bucket Sorting --------------------------------------------------------------------------------

/// Return frequency count of elements in the input. Size is the alphabet size.
fn bucket_sizes(data: &[u32], size: usize) -> Vec<u32> {
    let mut freqs = vec![0_u32; size];
    data.iter().for_each(|&el| freqs[el as usize] += 1);
    freqs
}

/// Returns index to top positions of buckets for bucket sorting.
fn bucket_heads(buckets: &[u32]) -> Vec<u32> {
    buckets
        .iter()
        .scan(0_u32, |idx, &count| {
            let head = *idx;
            *idx += count;
            Some(head)
        })
        .collect()
}

/// Returns index one past the bottom position of each bucket for bucket sorting.
fn bucket_tails(buckets: &[u32]) -> Vec<u32> {
    buckets
        .iter()
        .scan(0_u32, |idx, &count| {
            *idx += count;
            Some(*idx)
        })
        .collect()
}

//-- Bucket Sorting --------------------------------------------------------------------------------------------

/// Drop an element into the next free slot at the bottom of its bucket.
fn push_tail(data: &[u32], buckets: &mut [Option<u32>], tails: &mut [u32], idx: usize) {
    let bkt = data[idx] as usize;
    tails[bkt] -= 1;
    buckets[tails[bkt] as usize] = Some(idx as u32);
}

/// Induce L type elements into the sort array after allocation of LMS elements
fn induced_sort_l(data: &[u32], buckets: &mut [Option<u32>], bkt_sizes: &[u32], lms: &LMS) {
    let mut heads = bucket_heads(bkt_sizes);
    for idx in 0..buckets.len() {
        if let Some(el) = buckets[idx] {
            if el == 0 {
                continue;
            }
            let prev = el as usize - 1;
            if lms.is_l(prev) {
                let bkt = data[prev] as usize;
                buckets[heads[bkt] as usize] = Some(prev as u32);
                heads[bkt] += 1;
            }
        }
    }
}

/// Induce S type elements into the sort array after induced L sort
fn induced_sort_s(data: &[u32], buckets: &mut [Option<u32>], bkt_sizes: &[u32], lms: &LMS) {
    let mut tails = bucket_tails(bkt_sizes);
    for idx in (0..buckets.len()).rev() {
        if let Some(el) = buckets[idx] {
            if el == 0 {
                continue;
            }
            let prev = el as usize - 1;
            if lms.is_s(prev) {
                push_tail(data, buckets, &mut tails, prev);
            }
        }
    }
}

/// Name each LMS substring by its rank among the distinct LMS substrings. Returns the
/// reduced string (names in text order), the data position of each reduced symbol, and
/// the number of distinct names.
fn make_summary(data: &[u32], buckets: &[Option<u32>], lms: &LMS) -> (Vec<u32>, Vec<usize>, usize) {
    let mut names: Vec<Option<u32>> = vec![None; data.len()];
    let mut name = 0_u32;
    let mut prev: Option<usize> = None;

    for &el in buckets.iter().flatten() {
        let idx = el as usize;
        if !lms.is_lms(idx) {
            continue;
        }
        if let Some(p) = prev {
            if !lms.equal_lms(data, p, idx) {
                name += 1;
            }
        }
        names[idx] = Some(name);
        prev = Some(idx);
    }

    let offsets: Vec<usize> = (1..data.len()).filter(|&i| lms.is_lms(i)).collect();
    let summary = offsets
        .iter()
        .map(|&i| names[i].unwrap_or_default())
        .collect();
    (summary, offsets, name as usize + 1)
}

/// Sort the reduced string, recursing only when some LMS substrings share a name.
fn make_summary_suffix_vec(summary: &[u32], name_count: usize) -> Vec<u32> {
    if name_count == summary.len() {
        // Every name is unique, so the names are already the ranks
        let mut sorted = vec![0_u32; summary.len()];
        summary
            .iter()
            .enumerate()
            .for_each(|(i, &name)| sorted[name as usize] = i as u32);
        sorted
    } else {
        trace!(
            "SA-IS recursing on {} LMS substrings with {} names",
            summary.len(),
            name_count
        );
        sa_is(summary, name_count)
    }
}

/// SA-IS suffix array of `data`, which must end in a unique smallest sentinel.
fn sa_is(data: &[u32], alphabet_size: usize) -> Vec<u32> {
    if data.len() < 2 {
        return (0..data.len() as u32).collect();
    }

    // STEP 1: Build LMS info and bucket sizes
    let lms = LMS::new(data);
    let bkt_sizes = bucket_sizes(data, alphabet_size);

    // STEP 2: Bucket the LMS elements, then induce L and S types to sort the LMS substrings
    let mut buckets: Vec<Option<u32>> = vec![None; data.len()];
    let mut tails = bucket_tails(&bkt_sizes);
    for idx in 1..data.len() {
        if lms.is_lms(idx) {
            push_tail(data, &mut buckets, &mut tails, idx);
        }
    }
    induced_sort_l(data, &mut buckets, &bkt_sizes, &lms);
    induced_sort_s(data, &mut buckets, &bkt_sizes, &lms);

    // STEP 3: Name the LMS substrings and sort the reduced string
    let (summary, offsets, name_count) = make_summary(data, &buckets, &lms);
    debug_assert_eq!(summary.len(), lms.lms_count);
    let summary_suffix_vec = make_summary_suffix_vec(&summary, name_count);

    // STEP 4: Place the LMS elements in their final order and induce everything else from them
    buckets.iter_mut().for_each(|b| *b = None);
    let mut tails = bucket_tails(&bkt_sizes);
    for &el in summary_suffix_vec.iter().rev() {
        push_tail(data, &mut buckets, &mut tails, offsets[el as usize]);
    }
    induced_sort_l(data, &mut buckets, &bkt_sizes, &lms);
    induced_sort_s(data, &mut buckets, &bkt_sizes, &lms);

    // Every slot has been filled by now
    buckets.into_iter().map(|b| b.unwrap_or_default()).collect()
}

/// Sort all suffixes by direct comparison.
fn simple_sort(data: &[u32]) -> Vec<u32> {
    let mut sa: Vec<u32> = (0..data.len() as u32).collect();
    sa.sort_unstable_by(|&a, &b| data[a as usize..].cmp(&data[b as usize..]));
    sa
}

/// Returns the suffix array of `data`. The last symbol must be a sentinel that is unique and
/// smaller than every other symbol; all symbols must be below `alphabet_size`.
pub fn suffix_array(data: &[u32], alphabet_size: usize, algorithm: SortAlgorithm) -> Vec<u32> {
    let algorithm = match algorithm {
        SortAlgorithm::Auto if data.len() < SIMPLE_LIMIT => SortAlgorithm::Simple,
        SortAlgorithm::Auto => SortAlgorithm::Sais,
        chosen => chosen,
    };
    debug!("Sorting {} suffixes using {}", data.len(), algorithm);
    match algorithm {
        SortAlgorithm::Simple => simple_sort(data),
        _ => sa_is(data, alphabet_size),
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use rand::{rngs::StdRng, Rng, SeedableRng};

    /// Bytes shifted up by one with a zero sentinel appended.
    fn symbols(data: &[u8]) -> Vec<u32> {
        data.iter()
            .map(|&b| b as u32 + 1)
            .chain(std::iter::once(0))
            .collect()
    }

    #[test]
    fn lms_test() {
        // b a n a n a $  ->  L S L S L L S
        let data = symbols(b"banana");
        let lms = LMS::new(&data);
        assert!(lms.is_l(0));
        assert!(lms.is_s(1));
        assert!(lms.is_l(2));
        assert!(lms.is_s(3));
        assert!(lms.is_l(4));
        assert!(lms.is_l(5));
        assert!(lms.is_s(6));
        let found: Vec<usize> = (0..7).filter(|&i| lms.is_lms(i)).collect();
        assert_eq!(found, vec![1, 3, 6]);
        assert_eq!(lms.lms_count, 3);
        assert!(!lms.equal_lms(&data, 1, 3));
    }

    #[test]
    fn bucket_prep_test() {
        let data = [2, 0, 1, 1, 0, 6, 4];
        let sizes = bucket_sizes(&data, 7);
        assert_eq!(sizes, vec![2, 2, 1, 0, 1, 0, 1]);
        assert_eq!(bucket_heads(&sizes), vec![0, 2, 4, 5, 5, 6, 6]);
        assert_eq!(bucket_tails(&sizes), vec![2, 4, 5, 5, 6, 6, 7]);
    }

    #[test]
    fn banana_test() {
        let data = symbols(b"banana");
        let expected = vec![6, 5, 3, 1, 0, 4, 2];
        assert_eq!(suffix_array(&data, 257, SortAlgorithm::Simple), expected);
        assert_eq!(suffix_array(&data, 257, SortAlgorithm::Sais), expected);
    }

    #[test]
    fn sentinel_only_test() {
        assert_eq!(suffix_array(&[0], 257, SortAlgorithm::Sais), vec![0]);
        assert_eq!(suffix_array(&[0], 257, SortAlgorithm::Simple), vec![0]);
    }

    #[test]
    fn recursion_test() {
        // Repeated LMS substrings force at least one level of recursion
        let data = symbols(b"mmiissiissiippiimmiissiissiippii");
        assert_eq!(
            suffix_array(&data, 257, SortAlgorithm::Sais),
            simple_sort(&data)
        );
        let data = symbols(&[7_u8; 1000]);
        assert_eq!(
            suffix_array(&data, 257, SortAlgorithm::Sais),
            simple_sort(&data)
        );
    }

    #[test]
    fn random_agreement_test() {
        let mut rng = StdRng::seed_from_u64(0x5eed);
        for size in [1_usize, 2, 3, 17, 255, 256, 1000, 4096] {
            // Small alphabets give lots of repeats
            let data: Vec<u8> = (0..size).map(|_| rng.gen_range(0..4)).collect();
            let data = symbols(&data);
            assert_eq!(
                suffix_array(&data, 257, SortAlgorithm::Sais),
                simple_sort(&data),
                "size {}",
                size
            );
            assert_eq!(
                suffix_array(&data, 257, SortAlgorithm::Auto),
                simple_sort(&data)
            );
        }
    }
}
