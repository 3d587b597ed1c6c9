//! Suffix-array construction by almost-pure induced sorting (SA-IS).
//!
//! Operates on a string terminated by a unique smallest sentinel. Suffixes
//! are classified S- or L-type, the leftmost-S (LMS) suffixes are sorted by
//! one round of induced sorting, named, and — when names collide — the
//! reduced string of names is solved recursively. A final induced sort
//! spreads the sorted LMS suffixes into the full suffix array. Linear time,
//! linear space.

const EMPTY: i32 = -1;

/// Suffix array of `text ++ sentinel`. The result has `text.len() + 1`
/// entries; entry 0 is always the sentinel suffix `text.len()`.
pub fn suffix_array(text: &[u8]) -> Vec<i32> {
    let mut s: Vec<u32> = Vec::with_capacity(text.len() + 1);
    s.extend(text.iter().map(|&b| u32::from(b) + 1));
    s.push(0);
    sa_is(&s, 257)
}

/// Core recursion. `s` must end with a unique smallest symbol 0 and all
/// symbols must be below `k`.
fn sa_is(s: &[u32], k: usize) -> Vec<i32> {
    let n = s.len();
    let mut sa = vec![EMPTY; n];
    if n == 1 {
        sa[0] = 0;
        return sa;
    }
    if n == 2 {
        sa[0] = 1;
        sa[1] = 0;
        return sa;
    }

    // S/L classification; the sentinel is S-type by definition.
    let mut stype = vec![false; n];
    stype[n - 1] = true;
    for i in (0..n - 1).rev() {
        stype[i] = s[i] < s[i + 1] || (s[i] == s[i + 1] && stype[i + 1]);
    }

    let counts = symbol_counts(s, k);

    // First round: LMS suffixes dropped at their bucket tails in any order,
    // then induced, sorts every LMS *substring*.
    let mut tails = bucket_tails(&counts);
    for i in 1..n {
        if is_lms(&stype, i) {
            let c = s[i] as usize;
            tails[c] -= 1;
            sa[tails[c]] = i as i32;
        }
    }
    induce(s, &mut sa, &stype, &counts);

    // Name the LMS substrings in their now-sorted order. Equal substrings
    // share a name; the names, read in text order, form the reduced string.
    let mut names = vec![EMPTY; n / 2 + 1];
    let mut name: i32 = 0;
    let mut prev: Option<usize> = None;
    for &e in sa.iter() {
        let p = e as usize;
        if e > 0 && is_lms(&stype, p) {
            if let Some(q) = prev {
                if !lms_substring_eq(s, &stype, p, q) {
                    name += 1;
                }
            }
            names[p / 2] = name;
            prev = Some(p);
        }
    }
    let num_names = (name + 1) as usize;

    let lms_text: Vec<usize> = (1..n).filter(|&i| is_lms(&stype, i)).collect();
    let s1: Vec<u32> = lms_text.iter().map(|&p| names[p / 2] as u32).collect();

    let sa1: Vec<i32> = if num_names == s1.len() {
        // Every name unique: the reduced suffix array is a direct inversion.
        let mut sa1 = vec![0i32; s1.len()];
        for (i, &c) in s1.iter().enumerate() {
            sa1[c as usize] = i as i32;
        }
        sa1
    } else {
        sa_is(&s1, num_names)
    };

    // Final round: LMS suffixes seeded in their true order, induce the rest.
    sa.fill(EMPTY);
    let mut tails = bucket_tails(&counts);
    for &e in sa1.iter().rev() {
        let p = lms_text[e as usize];
        let c = s[p] as usize;
        tails[c] -= 1;
        sa[tails[c]] = p as i32;
    }
    induce(s, &mut sa, &stype, &counts);

    sa
}

#[inline]
fn is_lms(stype: &[bool], i: usize) -> bool {
    i > 0 && stype[i] && !stype[i - 1]
}

fn symbol_counts(s: &[u32], k: usize) -> Vec<usize> {
    let mut counts = vec![0usize; k];
    for &c in s {
        counts[c as usize] += 1;
    }
    counts
}

/// Exclusive prefix sums: index of the first slot of each bucket.
fn bucket_heads(counts: &[usize]) -> Vec<usize> {
    let mut heads = Vec::with_capacity(counts.len());
    let mut sum = 0usize;
    for &c in counts {
        heads.push(sum);
        sum += c;
    }
    heads
}

/// Inclusive prefix sums: one past the last slot of each bucket.
fn bucket_tails(counts: &[usize]) -> Vec<usize> {
    let mut tails = Vec::with_capacity(counts.len());
    let mut sum = 0usize;
    for &c in counts {
        sum += c;
        tails.push(sum);
    }
    tails
}

/// One L-pass (left to right) and one S-pass (right to left), each placing
/// the predecessor of every settled suffix into its bucket.
fn induce(s: &[u32], sa: &mut [i32], stype: &[bool], counts: &[usize]) {
    let n = s.len();

    let mut heads = bucket_heads(counts);
    for i in 0..n {
        let e = sa[i];
        if e > 0 {
            let p = (e - 1) as usize;
            if !stype[p] {
                let c = s[p] as usize;
                sa[heads[c]] = p as i32;
                heads[c] += 1;
            }
        }
    }

    let mut tails = bucket_tails(counts);
    for i in (0..n).rev() {
        let e = sa[i];
        if e > 0 {
            let p = (e - 1) as usize;
            if stype[p] {
                let c = s[p] as usize;
                tails[c] -= 1;
                sa[tails[c]] = p as i32;
            }
        }
    }
}

/// Equality of the LMS substrings starting at `a` and `b` (symbols and
/// types, up to and including the next LMS position).
fn lms_substring_eq(s: &[u32], stype: &[bool], a: usize, b: usize) -> bool {
    if a == b {
        return true;
    }
    let n = s.len();
    let mut d = 0usize;
    loop {
        if s[a + d] != s[b + d] || stype[a + d] != stype[b + d] {
            return false;
        }
        if d > 0 {
            let la = is_lms(stype, a + d);
            let lb = is_lms(stype, b + d);
            if la || lb {
                return la && lb;
            }
        }
        d += 1;
        if a + d >= n || b + d >= n {
            // Unreachable for well-formed input: the sentinel ends every
            // comparison first. Kept as a hard stop for safety.
            return false;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn naive(text: &[u8]) -> Vec<i32> {
        let n = text.len();
        let mut idx: Vec<usize> = (0..n).collect();
        idx.sort_by(|&a, &b| text[a..].cmp(&text[b..]));
        let mut sa = Vec::with_capacity(n + 1);
        sa.push(n as i32);
        sa.extend(idx.into_iter().map(|i| i as i32));
        sa
    }

    fn check(text: &[u8]) {
        assert_eq!(suffix_array(text), naive(text), "input {:?}", text);
    }

    #[test]
    fn known_strings() {
        check(b"banana");
        check(b"mississippi");
        check(b"abracadabra");
        check(b"");
        check(b"a");
        check(b"aa");
        check(b"ab");
        check(b"ba");
        check(b"aaaaaaaaaa");
        check(b"abababababab");
        check(b"yabbadabbado");
    }

    #[test]
    fn matches_naive_sort_on_small_random_inputs() {
        let mut x = 0x1234_5678u32;
        let mut next = || {
            x ^= x << 13;
            x ^= x >> 17;
            x ^= x << 5;
            x
        };
        for len in 0..96usize {
            for alphabet in [2u32, 3, 4, 256] {
                let text: Vec<u8> = (0..len).map(|_| (next() % alphabet) as u8).collect();
                check(&text);
            }
        }
    }

    #[test]
    fn long_runs_and_periods() {
        check(&[0u8; 300]);
        check(&[255u8; 300]);
        let period: Vec<u8> = b"abcab".iter().copied().cycle().take(500).collect();
        check(&period);
    }
}
