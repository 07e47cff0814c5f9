//! Audio IQ modem: bits are mapped to PSK symbols, pulse shaped with a root
//! raised cosine filter and mixed onto a carrier, and recovered again from
//! the sampled waveform.

pub mod filters;
pub mod psk;

pub use psk::PskModem;

use std::f64::consts::PI;

use log::info;
use num_complex::Complex64;

use crate::error::{Error, Result};
use filters::{convolve, firwin, lfilter, rrcosfilter, upfirdn};

const RRC_LEN_FACTOR: f64 = 6.0;
const RRC_ALPHA: f64 = 0.4;
const LP_CUTOFF_FACTOR: f64 = 5.0;
const LP_ORDER: usize = 51;

pub struct IqModem {
    psk: PskModem,
    f_symbol: u32,
    f_sample: u32,
    w_carrier: f64,
    upsample: usize,
    rrc: Vec<f64>,
    lowpass: Vec<f64>,
    delay_samples: usize,
}

impl IqModem {
    /// Build a modem with `const_size` PSK points sending `f_symbol` symbols
    /// per second on a `f_carrier` Hz carrier sampled at `f_sample` Hz.
    pub fn new(const_size: usize, f_symbol: u32, f_sample: u32, f_carrier: u32) -> Result<Self> {
        if f_symbol == 0 || f_sample < f_symbol {
            return Err(Error::Modem(format!(
                "sample rate {f_sample} cannot carry {f_symbol} symbols per second"
            )));
        }
        if 2 * f_carrier >= f_sample {
            return Err(Error::Modem(format!(
                "carrier {f_carrier} Hz is above the Nyquist rate of {f_sample} Hz sampling"
            )));
        }
        let psk = PskModem::new(const_size)?;
        let fs = f_sample as f64;
        let symbol_period = 1.0 / f_symbol as f64;
        let upsample = (symbol_period * fs) as usize;

        let rrc_len_sec = RRC_LEN_FACTOR * symbol_period;
        let rrc = rrcosfilter((rrc_len_sec * fs) as usize, RRC_ALPHA, symbol_period, fs);
        let rrc_delay = rrc_len_sec / 2.0;

        let cutoff = LP_CUTOFF_FACTOR * f_symbol as f64 / 2.0;
        let lowpass = firwin(LP_ORDER, cutoff / (fs / 2.0));
        let lp_delay = (LP_ORDER / 2) as f64 / fs;

        let delay_samples = ((2.0 * rrc_delay + lp_delay) * fs).round() as usize;

        info!(
            "IQ modem with const_size {const_size}, f_symbol {f_symbol}, \
             f_sample {f_sample} and f_carrier {f_carrier}"
        );
        Ok(Self {
            psk,
            f_symbol,
            f_sample,
            w_carrier: 2.0 * PI * f_carrier as f64,
            upsample,
            rrc,
            lowpass,
            delay_samples,
        })
    }

    /// QPSK at 128 symbols per second on a 1 kHz carrier sampled at 8 kHz.
    pub fn qpsk() -> Result<Self> {
        Self::new(4, 128, 8000, 1000)
    }

    /// Bits per second carried by the waveform.
    pub fn bitrate(&self) -> u32 {
        self.psk.bits_per_symbol() as u32 * self.f_symbol
    }

    pub fn sample_rate(&self) -> u32 {
        self.f_sample
    }

    /// Samples per symbol.
    pub fn upsample_factor(&self) -> usize {
        self.upsample
    }

    /// Samples between a symbol entering the transmit filter and its peak
    /// after receive filtering.
    pub fn filter_delay(&self) -> usize {
        self.delay_samples
    }

    /// Turn message bits into a real-valued waveform on the carrier.
    pub fn modulate(&self, bits: &[u8]) -> Result<Vec<f64>> {
        let symbols = self.psk.modulate(bits)?;
        let baseband = upfirdn(&self.rrc, &symbols, self.upsample);
        let fs = self.f_sample as f64;
        let wave: Vec<f64> = baseband
            .iter()
            .enumerate()
            .map(|(n, s)| {
                let wt = self.w_carrier * n as f64 / fs;
                s.re * wt.cos() - s.im * wt.sin()
            })
            .collect();
        info!(
            "Modulated {}-bit message into {} samples",
            bits.len(),
            wave.len()
        );
        Ok(wave)
    }

    /// Recover message bits from a waveform produced by [`modulate`].
    ///
    /// Filter tails add a few trailing symbols to the output; the message
    /// occupies its leading bits.
    ///
    /// [`modulate`]: IqModem::modulate
    pub fn demodulate(&self, wave: &[f64]) -> Vec<u8> {
        let fs = self.f_sample as f64;
        let (i_rail, q_rail): (Vec<f64>, Vec<f64>) = wave
            .iter()
            .enumerate()
            .map(|(n, &x)| {
                let wt = self.w_carrier * n as f64 / fs;
                (x * wt.cos(), -x * wt.sin())
            })
            .unzip();
        let i_rail = lfilter(&self.lowpass, &i_rail);
        let q_rail = lfilter(&self.lowpass, &q_rail);
        let recovered: Vec<Complex64> = i_rail
            .into_iter()
            .zip(q_rail)
            .map(|(i, q)| Complex64::new(i, q))
            .collect();
        let shaped = convolve(&recovered, &self.rrc);
        let symbols: Vec<Complex64> = shaped
            .into_iter()
            .skip(self.delay_samples)
            .step_by(self.upsample.max(1))
            .collect();
        let bits = self.psk.demodulate(&symbols);
        info!(
            "Demodulated {} samples into a {}-bit message",
            wave.len(),
            bits.len()
        );
        bits
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_parameters() {
        let m = IqModem::qpsk().unwrap();
        assert_eq!(m.bitrate(), 256);
        assert_eq!(m.sample_rate(), 8000);
        assert_eq!(m.upsample_factor(), 62);
        assert_eq!(m.filter_delay(), 400);
        assert_eq!(m.rrc.len(), 375);
    }

    #[test]
    fn rejects_carrier_above_nyquist() {
        assert!(IqModem::new(4, 128, 8000, 4000).is_err());
        assert!(IqModem::new(3, 128, 8000, 1000).is_err());
    }
}
