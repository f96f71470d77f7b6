/// In-progress gesture state of a single button, packed into one byte.
///
/// Each flag also marks whether its matching timestamp in `Button` is valid.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct Flags(u8);

impl Flags {
    /// Debounce timestamp is valid.
    pub const DEBOUNCING: u8 = 0x01;
    /// Press timestamp is valid.
    pub const PRESSED: u8 = 0x02;
    /// Click timestamp is valid; a click may still become a double-click.
    pub const CLICKED: u8 = 0x04;
    /// Set only while the releasing edge of a double-click is processed.
    pub const DOUBLE_CLICKED: u8 = 0x08;
    pub const LONG_PRESSED: u8 = 0x10;
    /// Repeat timestamp is valid.
    pub const REPEAT_PRESSED: u8 = 0x20;
    /// A Clicked event is being withheld.
    pub const CLICK_POSTPONED: u8 = 0x40;

    pub const fn empty() -> Self {
        Flags(0)
    }

    #[inline]
    pub fn get(self, flag: u8) -> bool {
        self.0 & flag != 0
    }

    #[inline]
    pub fn set(&mut self, flag: u8) {
        self.0 |= flag;
    }

    #[inline]
    pub fn clear(&mut self, flag: u8) {
        self.0 &= !flag;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_are_independent() {
        let mut flags = Flags::empty();
        flags.set(Flags::PRESSED);
        flags.set(Flags::LONG_PRESSED);
        flags.set(Flags::REPEAT_PRESSED);
        assert!(flags.get(Flags::PRESSED));
        assert!(flags.get(Flags::LONG_PRESSED));
        assert!(flags.get(Flags::REPEAT_PRESSED));
        assert!(!flags.get(Flags::CLICKED));

        flags.clear(Flags::LONG_PRESSED);
        assert!(!flags.get(Flags::LONG_PRESSED));
        assert!(flags.get(Flags::REPEAT_PRESSED));
        assert_eq!(flags, Flags(Flags::PRESSED | Flags::REPEAT_PRESSED));
    }
}
