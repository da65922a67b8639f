//! Integer widths accepted by [`Connection::write`](crate::Connection::write)

mod private {
    pub trait Sealed {}
}

/// An unsigned integer that can be shifted out bit by bit
///
/// Implemented for `u8`, `u16`, `u32` and `u64`. Sealed.
pub trait Word: Copy + private::Sealed {
    /// Number of bits the type can carry
    const BITS: u32;

    /// Widen to the engine's working type
    fn into_u64(self) -> u64;
}

macro_rules! impl_word {
    ($($ty:ty),*) => {
        $(
            impl private::Sealed for $ty {}

            impl Word for $ty {
                const BITS: u32 = <$ty>::BITS;

                #[inline]
                fn into_u64(self) -> u64 {
                    u64::from(self)
                }
            }
        )*
    };
}

impl_word!(u8, u16, u32, u64);
