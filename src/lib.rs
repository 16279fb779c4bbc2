//! Reed-Solomon error-correcting codec over GF(2^m)
//!
//! Encodes a message of up to `n - nroots` symbols (`n = 2^m - 1`) into a
//! systematic codeword by appending `nroots` parity symbols, and decodes a
//! possibly-corrupted block back in place. Up to `nroots / 2` unknown
//! symbol errors are correctable, or up to `nroots` erasures when the
//! caller can mark the unreliable positions. Shorter messages are handled
//! as shortened codes; nothing is transmitted for the implied zero prefix.
//!
//! Symbols travel in `u16` buffers and occupy the low `m` bits; callers
//! using wider storage must keep the upper bits zero. Field tables are
//! built once per parameter combination and shared process-wide, so codecs
//! are cheap to construct and safe to share across threads.
//!
//! ```
//! use rscodec::{Decoded, RsCodec};
//!
//! let codec = RsCodec::for_symbol_bits(8, 4)?;
//! let data: Vec<u16> = b"Hello, world!".iter().map(|&b| b as u16).collect();
//! let mut parity = vec![0u16; codec.nroots()];
//! codec.encode(&data, &mut parity)?;
//!
//! let mut received = data.clone();
//! received[0] ^= 0xff;
//! match codec.decode(&mut received, &mut parity)? {
//!     Decoded::Corrected(c) => assert_eq!(c.positions(), &[0]),
//!     other => panic!("unexpected outcome: {other:?}"),
//! }
//! assert_eq!(received, data);
//! # Ok::<(), rscodec::CodecError>(())
//! ```

pub mod codec;
pub mod error;
pub mod galois;
pub mod params;

pub use codec::{Corrections, Decoded, RsCodec};
pub use error::{CodecError, Result};
pub use params::CodecParams;
