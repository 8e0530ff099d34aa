// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Packed bit arrays.
//!
//! Bits are numbered most-significant first within each byte, i.e. bit `n`
//! lives in byte `n >> 3` at position `7 - (n & 7)`. Example: given a byte
//! value of 192 (0b11000000), bits 0 and 1 are set and bits 2 through 7 are
//! not. This layout is what gets written to disk, so it must not change.


use thiserror::Error;

/// Error for when memory for a buffer couldn't be obtained.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Couldn't allocate {num_bytes} bytes for {what}")]
pub struct AllocationError {
    /// What the memory was for.
    pub what: &'static str,

    /// How many bytes were requested.
    pub num_bytes: usize,
}

/// The number of bytes needed to hold `num_bits` bits.
#[inline]
pub const fn num_bytes_for(num_bits: usize) -> usize {
    (num_bits >> 3) + (num_bits & 7 != 0) as usize
}

/// Single-bit access to packed storage. Anything implementing this trait can
/// be used as a presence map, regardless of how the bits are stored.
///
/// Indices are not checked against the logical length of the storage; callers
/// are responsible for keeping them in range.
pub trait BitMask {
    /// Is bit `n` set?
    fn get_bit(&self, n: usize) -> bool;

    /// Set bit `n`.
    fn set_bit(&mut self, n: usize);

    /// Clear bit `n`.
    fn unset_bit(&mut self, n: usize);
}

impl BitMask for [u8] {
    #[inline]
    fn get_bit(&self, n: usize) -> bool {
        (self[n >> 3] >> (7 - (n & 7))) & 1 == 1
    }

    #[inline]
    fn set_bit(&mut self, n: usize) {
        self[n >> 3] |= 1 << (7 - (n & 7));
    }

    #[inline]
    fn unset_bit(&mut self, n: usize) {
        self[n >> 3] &= !(1 << (7 - (n & 7)));
    }
}

/// An owned, fixed-length array of bits.
#[derive(Clone, Default, PartialEq, Eq, Hash)]
pub struct BitArray {
    bytes: Vec<u8>,
    num_bits: usize,
}

impl BitArray {
    /// Create a zero-filled [`BitArray`] that can hold `num_bits` bits.
    ///
    /// # Panics
    ///
    /// Panics if the memory couldn't be allocated. Use [`BitArray::try_new`] to
    /// handle this case.
    pub fn new(num_bits: usize) -> BitArray {
        BitArray::from_vec(vec![0; num_bytes_for(num_bits)], num_bits)
    }

    /// Create a zero-filled [`BitArray`] that can hold `num_bits` bits,
    /// reporting an error if the memory couldn't be obtained.
    pub fn try_new(num_bits: usize) -> Result<BitArray, AllocationError> {
        let num_bytes = num_bytes_for(num_bits);
        let mut bytes = Vec::new();
        bytes
            .try_reserve_exact(num_bytes)
            .map_err(|_| AllocationError {
                what: "a bit array",
                num_bytes,
            })?;
        bytes.resize(num_bytes, 0);
        Ok(BitArray::from_vec(bytes, num_bits))
    }

    fn from_vec(bytes: Vec<u8>, num_bits: usize) -> BitArray {
        debug_assert_eq!(bytes.len(), num_bytes_for(num_bits));
        BitArray { bytes, num_bits }
    }

    /// The number of bits this array holds.
    pub fn num_bits(&self) -> usize {
        self.num_bits
    }

    /// The number of bytes used to store the bits.
    pub fn num_bytes(&self) -> usize {
        self.bytes.len()
    }

    #[inline]
    pub fn get(&self, n: usize) -> bool {
        debug_assert!(n < self.num_bits, "bit {n} >= {}", self.num_bits);
        self.bytes.get_bit(n)
    }

    #[inline]
    pub fn set(&mut self, n: usize) {
        debug_assert!(n < self.num_bits, "bit {n} >= {}", self.num_bits);
        self.bytes.set_bit(n)
    }

    #[inline]
    pub fn unset(&mut self, n: usize) {
        debug_assert!(n < self.num_bits, "bit {n} >= {}", self.num_bits);
        self.bytes.unset_bit(n)
    }

    /// Clear every bit.
    pub fn clear(&mut self) {
        self.bytes.iter_mut().for_each(|b| *b = 0);
    }

    /// Are any bits set?
    pub fn any(&self) -> bool {
        self.iter_ones().next().is_some()
    }

    /// The number of set bits. Padding bits in the last byte aren't counted.
    pub fn count_ones(&self) -> usize {
        self.iter_ones().count()
    }

    /// Iterate over the indices of set bits, in ascending order.
    pub fn iter_ones(&self) -> impl Iterator<Item = usize> + '_ {
        (0..self.num_bits).filter(move |&n| self.bytes.get_bit(n))
    }

    /// The packed bytes, in their on-disk layout.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub(crate) fn as_bytes_mut(&mut self) -> &mut [u8] {
        &mut self.bytes
    }
}

impl BitMask for BitArray {
    fn get_bit(&self, n: usize) -> bool {
        self.get(n)
    }

    fn set_bit(&mut self, n: usize) {
        self.set(n)
    }

    fn unset_bit(&mut self, n: usize) {
        self.unset(n)
    }
}

impl std::fmt::Debug for BitArray {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BitArray")
            .field("num_bits", &self.num_bits)
            .field("ones", &self.iter_ones().collect::<Vec<_>>())
            .finish()
    }
}
