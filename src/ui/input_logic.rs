/// Move a cursor one item back, wrapping from the first item to the last.
///
/// An empty collection has no valid position; the cursor stays at 0.
pub fn select_prev(selected: usize, item_count: usize) -> usize {
    if item_count == 0 {
        return 0;
    }
    if selected == 0 || selected >= item_count {
        item_count - 1
    } else {
        selected - 1
    }
}

/// Move a cursor one item forward, wrapping from the last item to the first.
pub fn select_next(selected: usize, item_count: usize) -> usize {
    if selected + 1 < item_count {
        selected + 1
    } else {
        0
    }
}

/// Scroll a letter one step back through `A..=Z`, wrapping `A` to `Z`.
pub fn letter_prev(c: u8) -> u8 {
    match c {
        b'B'..=b'Z' => c - 1,
        _ => b'Z',
    }
}

/// Scroll a letter one step forward through `A..=Z`, wrapping `Z` to `A`.
pub fn letter_next(c: u8) -> u8 {
    match c {
        b'A'..=b'Y' => c + 1,
        _ => b'A',
    }
}
