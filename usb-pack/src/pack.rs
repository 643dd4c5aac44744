use core::fmt;
use core::mem::size_of;

use zerocopy::{AsBytes, Unaligned};

/// A fixed-layout record whose in-memory representation is its wire image.
///
/// `AsBytes` rules out padding and `Unaligned` keeps records packable back
/// to back. The wire image is [`AsBytes::as_bytes`].
pub trait Descriptor: AsBytes + Unaligned + Copy {
    /// Size of the record on the wire, in bytes.
    const LEN: usize = size_of::<Self>();
}

impl Descriptor for u8 {}

/// Two descriptors laid out back to back, `head` first.
///
/// Longer sets nest to the right: `Pack<A, Pack<B, C>>`. Being packed, the
/// size of a `Pack` is always the sum of its members' sizes.
#[repr(C, packed)]
#[derive(AsBytes, Unaligned)]
pub struct Pack<A, B> {
    pub head: A,
    pub tail: B,
}

impl<A: Descriptor, B: Descriptor> Pack<A, B> {
    pub const fn new(head: A, tail: B) -> Self {
        Pack { head, tail }
    }

    pub const fn head(&self) -> A {
        self.head
    }

    pub const fn tail(&self) -> B {
        self.tail
    }
}

impl<A: Copy, B: Copy> Clone for Pack<A, B> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<A: Copy, B: Copy> Copy for Pack<A, B> {}

impl<A: Copy + fmt::Debug, B: Copy + fmt::Debug> fmt::Debug for Pack<A, B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let head = self.head;
        let tail = self.tail;
        f.debug_struct("Pack")
            .field("head", &head)
            .field("tail", &tail)
            .finish()
    }
}

impl<A: Descriptor, B: Descriptor> Descriptor for Pack<A, B> {}

/// Concatenates descriptors into one value, preserving argument order.
///
/// A single operand is returned as is. Otherwise the first operand is paired
/// with the packing of the rest.
#[macro_export]
macro_rules! pack {
    ($only:expr $(,)?) => {
        $only
    };
    ($head:expr, $($rest:expr),+ $(,)?) => {
        $crate::Pack::new($head, $crate::pack!($($rest),+))
    };
}

#[repr(C)]
union Image<T: Copy, const N: usize> {
    value: T,
    bytes: [u8; N],
}

/// Copies the wire image of `value` into an array, in const context.
///
/// Fails const evaluation (or panics at runtime) when `N` differs from the
/// size of `T`.
pub const fn to_array<T: Descriptor, const N: usize>(value: T) -> [u8; N] {
    assert!(size_of::<T>() == N, "array length does not match the descriptor size");

    // SAFETY: `T` and `[u8; N]` have the same size and `T: AsBytes` has no
    // padding, so all `N` bytes are initialized.
    unsafe { Image::<T, N> { value }.bytes }
}

#[cfg(test)]
mod tests {
    use super::{to_array, Descriptor, Pack};
    use crate::word::word;
    use core::mem::size_of;
    use zerocopy::{AsBytes, Unaligned};

    #[repr(C, packed)]
    #[derive(Debug, Clone, Copy, AsBytes, Unaligned)]
    struct Triple {
        a: u8,
        b: u8,
        c: u8,
    }

    impl Descriptor for Triple {}

    #[repr(C, packed)]
    #[derive(Debug, Clone, Copy, AsBytes, Unaligned)]
    struct Wide {
        a: u8,
        b: crate::WordLe,
    }

    impl Descriptor for Wide {}

    #[test]
    fn test_single_operand_is_identity() {
        let triple = Triple { a: 1, b: 2, c: 3 };
        let packed: Triple = pack!(triple);
        assert_eq!(packed.as_bytes(), triple.as_bytes());
        assert_eq!(size_of::<Triple>(), 3);
    }

    #[test]
    fn test_heterogeneous_concatenation() {
        let set = pack!(
            Triple { a: 1, b: 2, c: 3 },
            0xaa_u8,
            Wide { a: 4, b: word(0x0605) },
            Triple { a: 7, b: 8, c: 9 },
        );
        assert_eq!(size_of_val(&set), 3 + 1 + 3 + 3);
        assert_eq!(
            set.as_bytes(),
            &[1, 2, 3, 0xaa, 4, 5, 6, 7, 8, 9]
        );
    }

    #[test]
    fn test_nesting_does_not_change_image() {
        let a = Triple { a: 1, b: 2, c: 3 };
        let b = Wide { a: 4, b: word(0x0605) };
        let flat = pack!(a, b, 0x07_u8);
        let nested = Pack::new(Pack::new(a, b), 0x07_u8);
        assert_eq!(flat.as_bytes(), nested.as_bytes());
        assert_eq!(Pack::<Triple, Wide>::LEN, 6);
    }

    #[test]
    fn test_to_array_in_const() {
        const BYTES: [u8; 4] = to_array(pack!(Triple { a: 9, b: 8, c: 7 }, 6_u8));
        assert_eq!(BYTES, [9, 8, 7, 6]);
    }

    static_assertions::assert_impl_all!(Pack<Triple, Pack<u8, Wide>>: Descriptor, AsBytes, Unaligned);

    #[test]
    fn test_byte_view_matches_to_array() {
        fn view<T: AsBytes + Unaligned>(value: &T) -> &[u8] {
            value.as_bytes()
        }

        let set = pack!(Wide { a: 1, b: word(0x0302) }, Triple { a: 4, b: 5, c: 6 });
        let bytes: [u8; 6] = to_array(set);
        assert_eq!(view(&set), &bytes);
        assert_eq!(core::mem::align_of_val(&set), 1);
    }

    #[test]
    fn test_head_and_tail() {
        let set = pack!(1_u8, 2_u8, 3_u8);
        assert_eq!(set.head(), 1);
        assert_eq!(set.tail().as_bytes(), &[2, 3]);
    }

    #[test]
    #[should_panic(expected = "array length does not match")]
    fn test_to_array_length_mismatch() {
        let _: [u8; 2] = to_array(Triple { a: 0, b: 0, c: 0 });
    }

    fn size_of_val<T>(_: &T) -> usize {
        size_of::<T>()
    }
}
