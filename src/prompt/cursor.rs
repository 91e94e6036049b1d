//! Flat list cursor with wraparound.
//!
//! All functions take the list length at dispatch time; a stale index from a
//! list that has since shrunk is clamped before stepping.

/// Clamp `index` into `0..len` (0 for an empty list)
pub fn clamp(index: usize, len: usize) -> usize {
    if len == 0 {
        0
    } else {
        index.min(len - 1)
    }
}

/// Previous index, wrapping from the first to the last entry
pub fn step_up(index: usize, len: usize) -> usize {
    if len == 0 {
        return 0;
    }
    let index = clamp(index, len);
    if index > 0 {
        index - 1
    } else {
        len - 1
    }
}

/// Next index, wrapping from the last to the first entry
pub fn step_down(index: usize, len: usize) -> usize {
    if len == 0 {
        return 0;
    }
    let index = clamp(index, len);
    if index < len - 1 {
        index + 1
    } else {
        0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_wraps_at_boundaries() {
        assert_eq!(step_up(0, 3), 2);
        assert_eq!(step_down(2, 3), 0);
        assert_eq!(step_up(2, 3), 1);
        assert_eq!(step_down(0, 3), 1);
    }

    #[test]
    fn test_empty_list() {
        assert_eq!(step_up(0, 0), 0);
        assert_eq!(step_down(5, 0), 0);
        assert_eq!(clamp(5, 0), 0);
    }

    #[test]
    fn test_stale_index_clamped_to_current_length() {
        // List shrank from 10 entries to 4 while the cursor sat at 9
        assert_eq!(step_down(9, 4), 0);
        assert_eq!(step_up(9, 4), 2);
    }

    proptest! {
        #[test]
        fn cursor_is_sum_of_steps_mod_len(len in 1usize..20, steps in prop::collection::vec(any::<bool>(), 0..100)) {
            let mut cursor = 0usize;
            let mut sum: i64 = 0;
            for down in steps {
                if down {
                    cursor = step_down(cursor, len);
                    sum += 1;
                } else {
                    cursor = step_up(cursor, len);
                    sum -= 1;
                }
                prop_assert!(cursor < len);
            }
            prop_assert_eq!(cursor as i64, sum.rem_euclid(len as i64));
        }
    }
}
