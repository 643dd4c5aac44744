use static_assertions::{assert_eq_size, const_assert_eq};
use zerocopy::byteorder::{LittleEndian, U16};

/// A 16-bit descriptor field, stored little endian whatever the host is.
pub type WordLe = U16<LittleEndian>;

/// `WordLe::new` for const contexts.
pub const fn word(value: u16) -> WordLe {
    WordLe::from_bytes(value.to_le_bytes())
}

assert_eq_size!(WordLe, u16);
const_assert_eq!(core::mem::align_of::<WordLe>(), 1);

#[cfg(test)]
mod tests {
    use super::{word, WordLe};
    use zerocopy::AsBytes;

    #[test]
    fn test_little_endian_halves() {
        const BCD_USB: WordLe = word(0x0200);
        assert_eq!(BCD_USB.as_bytes(), &[0x00, 0x02]);
        assert_eq!(BCD_USB.get(), 0x0200);
        assert_eq!(BCD_USB, WordLe::new(0x0200));
        assert_eq!(u16::from(word(0x28de)), 0x28de);
    }
}
