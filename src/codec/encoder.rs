//! Systematic LFSR encoder
//!
//! Parity is the remainder of the message polynomial divided by the code
//! generator polynomial. The division runs as a linear feedback shift
//! register: the parity buffer holds the running remainder in element form
//! while the generator coefficients stay in index form, so each feedback
//! tap is one exponent add and one antilog lookup.

use super::RsCodec;
use crate::error::Result;

impl RsCodec {
    /// Compute the `nroots` parity symbols for `data`, writing them into
    /// `parity`.
    ///
    /// `data` may be any length up to [`capacity`](RsCodec::capacity); the
    /// block is treated as a shortened codeword with the missing prefix
    /// implied zero. Symbols occupy the low `m` bits of each `u16`; the
    /// upper bits must be zero. Only `parity` is mutated.
    pub fn encode(&self, data: &[u16], parity: &mut [u16]) -> Result<()> {
        self.encode_masked(data, parity, 0)
    }

    /// Like [`encode`](RsCodec::encode), but with every data symbol XOR-ed
    /// with `invmask` on the fly. A decode of the block must be given the
    /// same mask for the effective message to match.
    pub fn encode_masked(&self, data: &[u16], parity: &mut [u16], invmask: u16) -> Result<()> {
        self.check_geometry(data.len(), parity.len())?;
        let gf = self.tables();
        let nroots = parity.len();
        let a0 = gf.a0();

        parity.fill(0);
        if nroots == 0 {
            return Ok(());
        }
        for &sym in data {
            let feedback = gf.log(sym ^ invmask ^ parity[0]);
            if feedback != a0 {
                for j in 1..nroots {
                    parity[j] ^=
                        gf.alpha(gf.modnn(feedback as usize + gf.genpoly(nroots - j)));
                }
            }
            // Shift the register: parity[0] falls out as the feedback term
            // consumed above, the new low-order slot is filled below.
            parity.copy_within(1.., 0);
            parity[nroots - 1] = if feedback != a0 {
                gf.alpha(gf.modnn(feedback as usize + gf.genpoly(0)))
            } else {
                0
            };
        }
        Ok(())
    }
}
