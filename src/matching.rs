//! Matching blocks between two strings
//!
//! Recursive longest-common-substring alignment: find the longest run of
//! equal characters, then align what lies left and right of it the same
//! way. The blocks come out in order on both sides and never overlap, which
//! is what lets [`gaps`] read off the substrings in between.

use std::collections::HashMap;

/// A run of equal characters: `a[a..a + size] == b[b..b + size]`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Block {
    pub a: usize,
    pub b: usize,
    pub size: usize,
}

/// A pair of non-matching substrings that sit between two matching blocks
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Gap {
    /// Substring of the first (pattern) string
    pub left: String,
    /// Substring of the second (matched) string
    pub right: String,
}

struct Matcher<'s> {
    a: &'s [char],
    b: &'s [char],
    /// Positions of each character in `b`, ascending
    b2j: HashMap<char, Vec<usize>>,
}

impl<'s> Matcher<'s> {
    fn new(a: &'s [char], b: &'s [char]) -> Self {
        let mut b2j: HashMap<char, Vec<usize>> = HashMap::new();
        for (j, ch) in b.iter().enumerate() {
            b2j.entry(*ch).or_default().push(j);
        }
        Self { a, b, b2j }
    }

    /// Longest block inside `a[alo..ahi]` x `b[blo..bhi]`.
    ///
    /// Ties go to the block that starts earliest in `a`, then earliest in `b`.
    fn longest_match(&self, alo: usize, ahi: usize, blo: usize, bhi: usize) -> Block {
        let mut best = Block {
            a: alo,
            b: blo,
            size: 0,
        };
        // j2len[j]: length of the run ending at a[i - 1], b[j]
        let mut j2len: HashMap<usize, usize> = HashMap::new();

        for i in alo..ahi {
            let mut next: HashMap<usize, usize> = HashMap::new();
            if let Some(js) = self.b2j.get(&self.a[i]) {
                for &j in js {
                    if j < blo {
                        continue;
                    }
                    if j >= bhi {
                        break;
                    }
                    let k = j
                        .checked_sub(1)
                        .and_then(|prev| j2len.get(&prev))
                        .copied()
                        .unwrap_or(0)
                        + 1;
                    next.insert(j, k);
                    if k > best.size {
                        best = Block {
                            a: i + 1 - k,
                            b: j + 1 - k,
                            size: k,
                        };
                    }
                }
            }
            j2len = next;
        }

        best
    }

    fn matching_blocks(&self) -> Vec<Block> {
        let (la, lb) = (self.a.len(), self.b.len());
        let mut queue = vec![(0, la, 0, lb)];
        let mut found = Vec::new();

        while let Some((alo, ahi, blo, bhi)) = queue.pop() {
            let block = self.longest_match(alo, ahi, blo, bhi);
            if block.size == 0 {
                continue;
            }
            found.push(block);
            if alo < block.a && blo < block.b {
                queue.push((alo, block.a, blo, block.b));
            }
            if block.a + block.size < ahi && block.b + block.size < bhi {
                queue.push((block.a + block.size, ahi, block.b + block.size, bhi));
            }
        }
        found.sort();

        // Merge blocks that touch on both sides
        let mut merged: Vec<Block> = Vec::with_capacity(found.len() + 1);
        for block in found {
            match merged.last_mut() {
                Some(last) if last.a + last.size == block.a && last.b + last.size == block.b => {
                    last.size += block.size;
                }
                _ => merged.push(block),
            }
        }

        merged.push(Block {
            a: la,
            b: lb,
            size: 0,
        });
        merged
    }
}

/// Matching blocks of `a` and `b`, terminated by a `(len(a), len(b), 0)` sentinel.
///
/// Offsets count characters, not bytes.
pub fn matching_blocks(a: &str, b: &str) -> Vec<Block> {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    Matcher::new(&a, &b).matching_blocks()
}

/// Non-matching substring pairs of `a` and `b`, in order.
///
/// Covers the stretch before the first block, between blocks, and after the
/// last block. Pairs where both sides are empty are skipped.
pub fn gaps(a: &str, b: &str) -> Vec<Gap> {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let blocks = Matcher::new(&a, &b).matching_blocks();

    let mut result = Vec::new();
    let (mut ai, mut bi) = (0, 0);
    for block in blocks {
        if ai < block.a || bi < block.b {
            result.push(Gap {
                left: a[ai..block.a].iter().collect(),
                right: b[bi..block.b].iter().collect(),
            });
        }
        ai = block.a + block.size;
        bi = block.b + block.size;
    }
    result
}
