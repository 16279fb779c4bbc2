//! Error types for codec construction and block geometry checks

use thiserror::Error;

/// Errors that can occur while building a codec or checking block geometry.
///
/// An uncorrectable block is *not* an error: it is reported through
/// [`Decoded::Uncorrectable`](crate::Decoded) so that decoders embedded in
/// streaming code can react to bad frames without unwinding control flow.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodecError {
    /// The field generator polynomial does not generate the full
    /// multiplicative group of GF(2^m)
    #[error("polynomial {poly:#x} is not primitive over GF(2^{symbol_bits})")]
    NonPrimitivePolynomial { symbol_bits: u32, poly: u32 },

    /// Block geometry is impossible: the data length exceeds the payload
    /// capacity, the parity buffer does not match the parity count, or an
    /// erasure position falls outside the shortened block
    #[error("block geometry out of range: len {len} with {nroots} parity symbols in a {n}-symbol code")]
    LengthOutOfRange { len: usize, nroots: usize, n: usize },

    /// Parameter combination no codec can be built for
    #[error("unsupported codec parameters: {0}")]
    UnsupportedParameters(&'static str),
}

/// Type alias for Result with CodecError
pub type Result<T> = std::result::Result<T, CodecError>;
