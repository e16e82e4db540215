/// Render a sequence value as a GAB barcode, e.g. `LI000006399MA`
pub fn format_gab(sequence: u64) -> String {
    format!("LI{sequence:09}MA")
}

/// Monotonic counter backing GAB allocation.
///
/// Values are never reused, so a clear-then-regenerate cycle always yields
/// a barcode range disjoint from the previous one.
#[derive(Debug)]
pub struct SequenceAllocator {
    next: u64,
}

impl SequenceAllocator {
    pub fn new(start: u64) -> Self {
        Self { next: start }
    }

    pub fn next_value(&mut self) -> u64 {
        let value = self.next;
        self.next += 1;
        value
    }

    pub fn peek(&self) -> u64 {
        self.next
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gab_format_is_zero_padded() {
        assert_eq!(format_gab(1), "LI000000001MA");
        assert_eq!(format_gab(6399), "LI000006399MA");
        assert_eq!(format_gab(999_999_999), "LI999999999MA");
    }

    #[test]
    fn test_allocator_is_monotonic() {
        let mut allocator = SequenceAllocator::new(7);
        assert_eq!(allocator.next_value(), 7);
        assert_eq!(allocator.next_value(), 8);
        assert_eq!(allocator.peek(), 9);
    }
}
