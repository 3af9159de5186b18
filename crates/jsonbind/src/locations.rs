//! The per-class member location table.
//!
//! One table is built per class parse, sized by the contract's member count.
//! When the document delivers members in contract order every lookup
//! resolves in place; on a mismatch the table scans forward, caching the
//! sub-range of each interesting member it passes, so every member is
//! located exactly once however the document is ordered. Names are compared
//! by a murmur3 hash first and byte equality on a hash hit.

use crate::{
    error::{ErrorKind, JsonError},
    policy::ParsePolicy,
    state::ParseState,
};

/// murmur3 x86 32-bit, fixed seed. Collisions are tolerated: equality is
/// confirmed on every hash hit.
pub(crate) const fn name_hash(bytes: &[u8]) -> u32 {
    const C1: u32 = 0xcc9e_2d51;
    const C2: u32 = 0x1b87_3593;
    let mut h: u32 = 0xE3FC_9E1B;
    let blocks = bytes.len() / 4;
    let mut i = 0;
    while i < blocks {
        let b = i * 4;
        let mut k = u32::from_le_bytes([bytes[b], bytes[b + 1], bytes[b + 2], bytes[b + 3]]);
        k = k.wrapping_mul(C1).rotate_left(15).wrapping_mul(C2);
        h = (h ^ k).rotate_left(13).wrapping_mul(5).wrapping_add(0xe654_6b64);
        i += 1;
    }
    let mut k: u32 = 0;
    let tail = blocks * 4;
    let rem = bytes.len() - tail;
    if rem >= 3 {
        k ^= (bytes[tail + 2] as u32) << 16;
    }
    if rem >= 2 {
        k ^= (bytes[tail + 1] as u32) << 8;
    }
    if rem >= 1 {
        k ^= bytes[tail] as u32;
        k = k.wrapping_mul(C1).rotate_left(15).wrapping_mul(C2);
        h ^= k;
    }
    h ^= bytes.len() as u32;
    h ^= h >> 16;
    h = h.wrapping_mul(0x85eb_ca6b);
    h ^= h >> 13;
    h = h.wrapping_mul(0xc2b2_ae35);
    h ^ (h >> 16)
}

/// A cached member position: the value's token sub-range plus the counter
/// recorded while skipping it.
#[derive(Debug, Clone, Copy)]
struct CachedRange {
    first: usize,
    last: usize,
    counter: isize,
}

/// Where a requested member was found.
pub(crate) enum MemberLocation {
    /// The live cursor is already positioned at the member's value.
    InPlace,
    /// The member was passed earlier; parse from the cached sub-range.
    Cached {
        /// Token start.
        first: usize,
        /// Token end.
        last: usize,
        /// Skip counter (array element count / string escape offset).
        counter: isize,
    },
    /// The class ended without the member appearing.
    Missing,
}

/// Lazily-seeded map from contract member index to source sub-range.
#[derive(Debug)]
pub struct LocationTable<const N: usize> {
    names: &'static [&'static str],
    hashes: [u32; N],
    ranges: [Option<CachedRange>; N],
}

impl<const N: usize> LocationTable<N> {
    /// Build the table for a contract's member name list.
    #[must_use]
    pub fn new(names: &'static [&'static str]) -> Self {
        debug_assert_eq!(names.len(), N);
        let mut hashes = [0u32; N];
        let mut i = 0;
        while i < N {
            hashes[i] = name_hash(names[i].as_bytes());
            i += 1;
        }
        Self {
            names,
            hashes,
            ranges: [None; N],
        }
    }

    pub(crate) fn name(&self, index: usize) -> &'static str {
        self.names[index]
    }

    fn index_of(&self, name: &[u8]) -> Option<usize> {
        let hash = name_hash(name);
        (0..N).find(|&i| self.hashes[i] == hash && self.names[i].as_bytes() == name)
    }

    /// Locate member `index`, scanning forward from the cursor as needed.
    ///
    /// The scan caches the sub-range of every not-yet-seen contract member
    /// it passes. A member name seen twice keeps its first occurrence.
    pub(crate) fn find<'a, P: ParsePolicy>(
        &mut self,
        index: usize,
        state: &mut ParseState<'a, P>,
    ) -> Result<MemberLocation, JsonError> {
        if let Some(range) = self.ranges[index] {
            return Ok(MemberLocation::Cached {
                first: range.first,
                last: range.last,
                counter: range.counter,
            });
        }
        loop {
            state.clean_tail();
            if !state.has_more() {
                // A well-formed class ends with `}`; running out of bytes is
                // truncation, not a missing member.
                if P::VALIDATED {
                    return Err(state.error(ErrorKind::UnexpectedEndOfData));
                }
                return Ok(MemberLocation::Missing);
            }
            if state.front_is(b'}') {
                return Ok(MemberLocation::Missing);
            }
            if P::VALIDATED && !state.is_at_next_class_member() {
                return Err(state.error(ErrorKind::MissingMemberNameOrEndOfClass));
            }
            let name = parse_member_name(state)?;
            match self.index_of(name.as_bytes()) {
                Some(i) if i == index => return Ok(MemberLocation::InPlace),
                Some(i) if self.ranges[i].is_none() => {
                    let sub = state.skip_value()?;
                    self.ranges[i] = Some(CachedRange {
                        first: sub.first,
                        last: sub.last,
                        counter: sub.counter,
                    });
                }
                // Duplicate of an already-cached member, or a member the
                // contract does not know: skip it.
                _ => {
                    state.skip_value()?;
                }
            }
        }
    }
}

/// Consume `"name"`, surrounding whitespace, and the `:`; return the name's
/// raw bytes, escapes intact; contract names are compared bytewise.
pub(crate) fn parse_member_name<'a, P: ParsePolicy>(
    state: &mut ParseState<'a, P>,
) -> Result<&'a str, JsonError> {
    let token = state.skip_string()?;
    let bytes = token.as_bytes();
    let name = if bytes.len() >= 2 {
        &token.as_str()[1..bytes.len() - 1]
    } else {
        token.as_str()
    };
    state.trim_left();
    state.expect_front(b':', ErrorKind::MissingToken(':'))?;
    state.trim_left();
    Ok(name)
}
