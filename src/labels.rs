/// Window label: true iff any sample in the window is seizure-flagged.
#[inline]
pub fn aggregate(flags: &[bool]) -> bool {
    flags.iter().any(|&f| f)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_window_is_negative() {
        assert!(!aggregate(&[]));
    }

    #[test]
    fn test_all_sequences_up_to_eight_samples() {
        for len in 1..=8usize {
            for bits in 0u32..(1 << len) {
                let flags: Vec<bool> = (0..len).map(|i| bits & (1 << i) != 0).collect();
                assert_eq!(aggregate(&flags), bits != 0, "flags {:?}", flags);
            }
        }
    }

    #[test]
    fn test_single_flag_at_either_edge() {
        let mut flags = vec![false; 400];
        flags[0] = true;
        assert!(aggregate(&flags));
        flags[0] = false;
        flags[399] = true;
        assert!(aggregate(&flags));
    }
}
