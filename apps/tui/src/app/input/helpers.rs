pub const fn wrap_decrement(index: usize, len: usize) -> usize {
    if len == 0 {
        return 0;
    }

    if index == 0 {
        len - 1
    } else {
        index - 1
    }
}

pub const fn wrap_increment(index: usize, len: usize) -> usize {
    if len == 0 {
        return 0;
    }

    (index + 1) % len
}

/// Moves `index` by `step` rows, stopping at either end.
pub const fn step_clamped(index: usize, step: isize, len: usize) -> usize {
    if len == 0 {
        return 0;
    }

    let moved = index.saturating_add_signed(step);
    if moved >= len {
        len - 1
    } else {
        moved
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wrapping_cycles_both_ways() {
        assert_eq!(wrap_increment(2, 3), 0);
        assert_eq!(wrap_decrement(0, 3), 2);
        assert_eq!(wrap_increment(0, 0), 0);
    }

    #[test]
    fn clamped_steps_stop_at_the_ends() {
        assert_eq!(step_clamped(0, -5, 10), 0);
        assert_eq!(step_clamped(8, 5, 10), 9);
        assert_eq!(step_clamped(3, 1, 0), 0);
    }
}
