//! Index arithmetic over cyclic sequences. A `len` of zero always yields 0.

pub fn next_index(index: usize, len: usize) -> usize {
    if len == 0 { 0 } else { (index % len + 1) % len }
}

pub fn previous_index(index: usize, len: usize) -> usize {
    if len == 0 {
        0
    } else {
        (index % len + len - 1) % len
    }
}

/// Moves `steps` positions forward.
pub fn advance_index(index: usize, steps: u32, len: usize) -> usize {
    if len == 0 {
        0
    } else {
        (index % len + steps as usize % len) % len
    }
}
