//! Reed-Solomon encoder/decoder over GF(2^m)
//!
//! A block is laid out `data[0..len] || parity[0..nroots]` and viewed as a
//! shortened code of length `n = 2^m - 1`: the decoder treats the block as
//! if `pad = n - nroots - len` zero symbols preceded the data. Neither side
//! transmits or stores the padding.

pub mod decoder;
pub mod encoder;

pub use decoder::{Corrections, Decoded};

use std::sync::Arc;

use crate::error::{CodecError, Result};
use crate::galois::{self, GfTables};
use crate::params::CodecParams;

/// Reed-Solomon codec for one fixed parameter bundle.
///
/// Construction builds (or fetches from the process-wide cache) the field
/// tables; afterwards the codec is immutable. `encode` and `decode` take
/// `&self` and mutate only the caller's buffers, so one codec can serve any
/// number of threads working on disjoint blocks.
pub struct RsCodec {
    params: CodecParams,
    tables: Arc<GfTables>,
}

impl RsCodec {
    /// Build a codec for `params`.
    pub fn new(params: CodecParams) -> Result<Self> {
        params.validate()?;
        let tables = galois::shared_tables(&params)?;
        Ok(Self { params, tables })
    }

    /// Codec over the conventional field polynomial for `symbol_bits`.
    pub fn for_symbol_bits(symbol_bits: u32, nroots: usize) -> Result<Self> {
        Self::new(CodecParams::for_symbol_bits(symbol_bits, nroots)?)
    }

    /// Codec with the CCSDS telemetry parameters.
    pub fn ccsds(nroots: usize) -> Result<Self> {
        Self::new(CodecParams::ccsds(nroots))
    }

    /// The parameter bundle this codec was built from.
    #[inline]
    pub fn params(&self) -> &CodecParams {
        &self.params
    }

    /// Full code length `n = 2^m - 1` in symbols.
    #[inline]
    pub fn n(&self) -> usize {
        self.params.n()
    }

    /// Number of parity symbols per block.
    #[inline]
    pub fn nroots(&self) -> usize {
        self.params.nroots
    }

    /// Maximum data symbols per block, `n - nroots`.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.params.capacity()
    }

    /// The shared field tables backing this codec.
    #[inline]
    pub fn tables(&self) -> &GfTables {
        &self.tables
    }

    /// Check block geometry and return the implied zero padding
    /// `pad = n - nroots - len`.
    pub(crate) fn check_geometry(&self, len: usize, parity_len: usize) -> Result<usize> {
        let nroots = self.nroots();
        if parity_len != nroots || len > self.capacity() {
            return Err(CodecError::LengthOutOfRange {
                len,
                nroots,
                n: self.n(),
            });
        }
        Ok(self.capacity() - len)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accessors() {
        let codec = RsCodec::for_symbol_bits(8, 4).unwrap();
        assert_eq!(codec.n(), 255);
        assert_eq!(codec.nroots(), 4);
        assert_eq!(codec.capacity(), 251);
        assert_eq!(codec.params().poly, 0x11d);
    }

    #[test]
    fn test_codecs_share_tables() {
        let a = RsCodec::for_symbol_bits(8, 4).unwrap();
        let b = RsCodec::for_symbol_bits(8, 4).unwrap();
        assert!(Arc::ptr_eq(&a.tables, &b.tables));
    }

    #[test]
    fn test_geometry_check() {
        let codec = RsCodec::for_symbol_bits(8, 4).unwrap();
        assert_eq!(codec.check_geometry(251, 4).unwrap(), 0);
        assert_eq!(codec.check_geometry(13, 4).unwrap(), 238);
        assert_eq!(codec.check_geometry(0, 4).unwrap(), 251);
        assert!(codec.check_geometry(252, 4).is_err());
        assert!(codec.check_geometry(13, 3).is_err());
    }

    #[test]
    fn test_construction_rejects_bad_params() {
        assert!(matches!(
            RsCodec::new(CodecParams::new(8, 0x11b, 1, 1, 4)),
            Err(CodecError::NonPrimitivePolynomial { .. })
        ));
        assert!(matches!(
            RsCodec::new(CodecParams::new(8, 0x11d, 1, 5, 4)),
            Err(CodecError::UnsupportedParameters(_))
        ));
    }
}
