use std::f64::consts::PI;

use num_complex::Complex64;

use crate::error::{Error, Result};

/// Phase shift keying map with `m` points evenly spaced on the unit circle.
///
/// Point `k` is `exp(j * 2 * pi * k / m)`. Bits are grouped MSB first into
/// the point index.
#[derive(Clone, Debug)]
pub struct PskModem {
    constellation: Vec<Complex64>,
    bits_per_symbol: usize,
}

impl PskModem {
    /// `m` must be a power of two of at least 2.
    pub fn new(m: usize) -> Result<Self> {
        if m < 2 || !m.is_power_of_two() {
            return Err(Error::Modem(format!(
                "constellation size {m} is not a power of two"
            )));
        }
        let constellation = (0..m)
            .map(|k| Complex64::from_polar(1.0, 2.0 * PI * k as f64 / m as f64))
            .collect();
        Ok(Self {
            constellation,
            bits_per_symbol: m.trailing_zeros() as usize,
        })
    }

    pub fn bits_per_symbol(&self) -> usize {
        self.bits_per_symbol
    }

    pub fn constellation(&self) -> &[Complex64] {
        &self.constellation
    }

    /// Map `bits` (each 0 or 1) to constellation points.
    pub fn modulate(&self, bits: &[u8]) -> Result<Vec<Complex64>> {
        if bits.len() % self.bits_per_symbol != 0 {
            return Err(Error::Modem(format!(
                "{} bits do not fill whole {}-bit symbols",
                bits.len(),
                self.bits_per_symbol
            )));
        }
        bits.chunks(self.bits_per_symbol)
            .map(|group| {
                let mut index = 0usize;
                for &b in group {
                    if b > 1 {
                        return Err(Error::Modem(format!("{b} is not a bit")));
                    }
                    index = (index << 1) | b as usize;
                }
                Ok(self.constellation[index])
            })
            .collect()
    }

    /// Hard decision: emit the bits of the nearest point for every symbol.
    pub fn demodulate(&self, symbols: &[Complex64]) -> Vec<u8> {
        let mut bits = Vec::with_capacity(symbols.len() * self.bits_per_symbol);
        for s in symbols {
            let index = self.nearest(*s);
            for shift in (0..self.bits_per_symbol).rev() {
                bits.push(((index >> shift) & 1) as u8);
            }
        }
        bits
    }

    fn nearest(&self, s: Complex64) -> usize {
        let mut best = 0;
        let mut best_dist = f64::INFINITY;
        for (k, p) in self.constellation.iter().enumerate() {
            let d = (s - p).norm_sqr();
            if d < best_dist {
                best = k;
                best_dist = d;
            }
        }
        best
    }
}
