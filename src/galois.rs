//! Galois Field GF(2^m) log/antilog tables and the code generator polynomial
//!
//! Field elements have two representations. *Element form* is the raw
//! polynomial-basis value in `[0, n-1]`; addition is XOR. *Index form* is the
//! discrete logarithm to base alpha, in `[0, n]`, where the sentinel
//! [`GfTables::a0`] (`A0 = n`) stands for "log of zero". Index form turns
//! multiplication into addition of exponents reduced mod `n`, which is what
//! every hot loop in the encoder and decoder runs on.
//!
//! Tables are immutable after construction and shared process-wide: one
//! `Arc<GfTables>` per parameter tuple, handed out by [`shared_tables`]
//! behind a one-shot initialisation guard.

use std::sync::{Arc, Mutex, OnceLock};

use rustc_hash::FxHashMap;

use crate::error::{CodecError, Result};
use crate::params::CodecParams;

/// Precomputed lookup tables for one parameter tuple.
///
/// `alpha_to` maps exponents to elements (antilog), `index_of` maps elements
/// to exponents (log), and `genpoly` holds the code generator polynomial in
/// index form for the encoder's feedback loop.
#[derive(Debug)]
pub struct GfTables {
    symbol_bits: u32,
    /// `2^m - 1`: code length, multiplicative group order, and A0 sentinel
    nn: usize,
    alpha_to: Vec<u16>,
    index_of: Vec<u16>,
    genpoly: Vec<u16>,
    /// Inverse of the primitive-element stride mod `nn`
    iprim: usize,
}

/// One step of the field LFSR: advance `sr` by multiplication with alpha,
/// reducing by `poly` when the register overflows the symbol width.
#[inline]
fn lfsr_step(symbol_bits: u32, poly: u32, nn: usize, sr: usize) -> usize {
    if sr == 0 {
        1
    } else {
        let mut next = sr << 1;
        if next & (1 << symbol_bits) != 0 {
            next ^= poly as usize;
        }
        next & nn
    }
}

impl GfTables {
    /// Build all tables for `params`. Fails with
    /// [`CodecError::NonPrimitivePolynomial`] when the field polynomial does
    /// not cycle through the full multiplicative group; nothing
    /// partially-built escapes on that path.
    pub(crate) fn build(params: &CodecParams) -> Result<Self> {
        let symbol_bits = params.symbol_bits;
        let nn = params.n();
        let a0 = nn;

        let mut alpha_to = vec![0u16; nn + 1];
        let mut index_of = vec![0u16; nn + 1];

        index_of[0] = a0 as u16;
        alpha_to[a0] = 0;
        let mut sr = lfsr_step(symbol_bits, params.poly, nn, 0);
        for i in 0..nn {
            index_of[sr] = i as u16;
            alpha_to[i] = sr as u16;
            sr = lfsr_step(symbol_bits, params.poly, nn, sr);
        }
        // A primitive polynomial walks every nonzero element exactly once
        // and lands back on alpha^0.
        if sr != alpha_to[0] as usize {
            return Err(CodecError::NonPrimitivePolynomial {
                symbol_bits,
                poly: params.poly,
            });
        }

        let modnn = |mut x: usize| {
            while x >= nn {
                x -= nn;
                x = (x >> symbol_bits) + (x & nn);
            }
            x
        };

        // Smallest iprim with iprim * prim == 1 (mod nn). Terminates because
        // prim is validated coprime to nn.
        let prim = params.prim as usize;
        let mut iprim = 1;
        while iprim % prim != 0 {
            iprim += nn;
        }
        let iprim = iprim / prim;

        // Generator polynomial: product of (x - alpha^((fcr + i) * prim)),
        // built in element form and converted to index form for the encoder.
        let nroots = params.nroots;
        let mut genpoly = vec![0u16; nroots + 1];
        genpoly[0] = 1;
        let mut root = params.fcr as usize * prim;
        for i in 0..nroots {
            genpoly[i + 1] = 1;
            for j in (1..=i).rev() {
                if genpoly[j] != 0 {
                    genpoly[j] = genpoly[j - 1]
                        ^ alpha_to[modnn(index_of[genpoly[j] as usize] as usize + root)];
                } else {
                    genpoly[j] = genpoly[j - 1];
                }
            }
            genpoly[0] = alpha_to[modnn(index_of[genpoly[0] as usize] as usize + root)];
            root += prim;
        }
        for g in genpoly.iter_mut() {
            *g = index_of[*g as usize];
        }

        Ok(Self {
            symbol_bits,
            nn,
            alpha_to,
            index_of,
            genpoly,
            iprim,
        })
    }

    /// Code length `n = 2^m - 1`.
    #[inline]
    pub fn n(&self) -> usize {
        self.nn
    }

    /// The "log of zero" sentinel used in index-form buffers.
    #[inline]
    pub fn a0(&self) -> u16 {
        self.nn as u16
    }

    /// Antilog: element for exponent `i`, with `alpha(A0) == 0`.
    #[inline]
    pub fn alpha(&self, i: usize) -> u16 {
        self.alpha_to[i]
    }

    /// Log: exponent of element `x`, with `log(0) == A0`.
    #[inline]
    pub fn log(&self, x: u16) -> u16 {
        self.index_of[x as usize]
    }

    /// Generator polynomial coefficient `i` in index form.
    #[inline]
    pub(crate) fn genpoly(&self, i: usize) -> usize {
        self.genpoly[i] as usize
    }

    /// Inverse of the primitive-element stride mod `n`.
    #[inline]
    pub fn iprim(&self) -> usize {
        self.iprim
    }

    /// Reduce a non-negative exponent sum mod `n` without dividing.
    ///
    /// Folding `(x >> m) + (x & n)` strips one multiple of `2^m - 1` per
    /// round; the subtraction first keeps exact multiples of `n` from
    /// sticking at `n`. Index sums on the hot paths stay below `3n` and
    /// settle in at most two rounds.
    #[inline]
    pub fn modnn(&self, mut x: usize) -> usize {
        while x >= self.nn {
            x -= self.nn;
            x = (x >> self.symbol_bits) + (x & self.nn);
        }
        x
    }

    /// Multiply two element-form values through the log tables.
    #[inline]
    pub fn mul(&self, a: u16, b: u16) -> u16 {
        if a == 0 || b == 0 {
            return 0;
        }
        self.alpha_to
            [self.modnn(self.index_of[a as usize] as usize + self.index_of[b as usize] as usize)]
    }

    /// Divide two element-form values through the log tables.
    ///
    /// # Panics
    ///
    /// Panics when `b` is zero.
    #[inline]
    pub fn div(&self, a: u16, b: u16) -> u16 {
        if b == 0 {
            panic!("division by zero in GF(2^{})", self.symbol_bits);
        }
        if a == 0 {
            return 0;
        }
        let diff =
            self.index_of[a as usize] as usize + self.nn - self.index_of[b as usize] as usize;
        self.alpha_to[self.modnn(diff)]
    }
}

/// Greatest common divisor, used to check that the primitive-element stride
/// is invertible mod `n`.
pub fn gcd(mut a: usize, mut b: usize) -> usize {
    while b != 0 {
        let r = a % b;
        a = b;
        b = r;
    }
    a
}

type TableKey = (u32, u32, u32, u32, usize);

static TABLE_CACHE: OnceLock<Mutex<FxHashMap<TableKey, Arc<GfTables>>>> = OnceLock::new();

/// Fetch the tables for `params`, building them on first use.
///
/// The cache mutex makes the check-then-initialise race-free: concurrent
/// first users serialise on construction, later users clone the `Arc` and
/// read lock-free. Failed constructions are not cached.
pub(crate) fn shared_tables(params: &CodecParams) -> Result<Arc<GfTables>> {
    let cache = TABLE_CACHE.get_or_init(|| Mutex::new(FxHashMap::default()));
    let key = (
        params.symbol_bits,
        params.poly,
        params.fcr,
        params.prim,
        params.nroots,
    );
    let mut map = match cache.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    };
    if let Some(tables) = map.get(&key) {
        return Ok(Arc::clone(tables));
    }
    let tables = Arc::new(GfTables::build(params)?);
    map.insert(key, Arc::clone(&tables));
    Ok(tables)
}
