//! FIR design and filtering helpers for the IQ modem.

use std::f64::consts::PI;
use std::ops::{Add, Mul};

/// Root raised cosine impulse response of `n` taps.
///
/// `alpha` is the roll-off, `ts` the symbol period in seconds and `fs` the
/// sample rate. Tap `x` sits at time `(x - n / 2) / fs`.
pub fn rrcosfilter(n: usize, alpha: f64, ts: f64, fs: f64) -> Vec<f64> {
    let dt = 1.0 / fs;
    let eps = 1e-12;
    (0..n)
        .map(|x| {
            let t = (x as f64 - n as f64 / 2.0) * dt;
            if t.abs() < eps {
                1.0 - alpha + 4.0 * alpha / PI
            } else if alpha != 0.0 && (t.abs() - ts / (4.0 * alpha)).abs() < eps {
                (alpha / 2f64.sqrt())
                    * ((1.0 + 2.0 / PI) * (PI / (4.0 * alpha)).sin()
                        + (1.0 - 2.0 / PI) * (PI / (4.0 * alpha)).cos())
            } else {
                let r = 4.0 * alpha * t / ts;
                ((PI * t * (1.0 - alpha) / ts).sin()
                    + 4.0 * alpha * (t / ts) * (PI * t * (1.0 + alpha) / ts).cos())
                    / (PI * t * (1.0 - r * r) / ts)
            }
        })
        .collect()
}

/// Lowpass FIR of `numtaps` taps by the Hamming window method.
///
/// `cutoff` is relative to the Nyquist frequency (`0 < cutoff < 1`). Taps
/// are scaled so the DC gain is exactly one.
pub fn firwin(numtaps: usize, cutoff: f64) -> Vec<f64> {
    if numtaps == 0 {
        return Vec::new();
    }
    let center = 0.5 * (numtaps as f64 - 1.0);
    let mut h: Vec<f64> = (0..numtaps)
        .map(|i| {
            let m = i as f64 - center;
            cutoff * sinc(cutoff * m) * hamming(i, numtaps)
        })
        .collect();
    let sum: f64 = h.iter().sum();
    if sum != 0.0 {
        h.iter_mut().for_each(|v| *v /= sum);
    }
    h
}

fn sinc(x: f64) -> f64 {
    if x == 0.0 {
        1.0
    } else {
        (PI * x).sin() / (PI * x)
    }
}

fn hamming(i: usize, n: usize) -> f64 {
    if n == 1 {
        return 1.0;
    }
    0.54 - 0.46 * (2.0 * PI * i as f64 / (n as f64 - 1.0)).cos()
}

/// Insert `up - 1` zeros between the samples of `x` and filter with `h`.
///
/// The output has `(x.len() - 1) * up + h.len()` samples.
pub fn upfirdn<T>(h: &[f64], x: &[T], up: usize) -> Vec<T>
where
    T: Copy + Default + Add<Output = T> + Mul<f64, Output = T>,
{
    if x.is_empty() || h.is_empty() {
        return Vec::new();
    }
    let up = up.max(1);
    let mut out = vec![T::default(); (x.len() - 1) * up + h.len()];
    for (k, &xk) in x.iter().enumerate() {
        let start = k * up;
        for (j, &hj) in h.iter().enumerate() {
            out[start + j] = out[start + j] + xk * hj;
        }
    }
    out
}

/// Causal FIR filter; the output has the same length as `x`.
pub fn lfilter<T>(b: &[f64], x: &[T]) -> Vec<T>
where
    T: Copy + Default + Add<Output = T> + Mul<f64, Output = T>,
{
    (0..x.len())
        .map(|n| {
            b.iter()
                .take(n + 1)
                .enumerate()
                .fold(T::default(), |acc, (k, &bk)| acc + x[n - k] * bk)
        })
        .collect()
}

/// Full discrete convolution of `x` with `h`.
pub fn convolve<T>(x: &[T], h: &[f64]) -> Vec<T>
where
    T: Copy + Default + Add<Output = T> + Mul<f64, Output = T>,
{
    upfirdn(h, x, 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn firwin_has_unity_dc_gain_and_symmetry() {
        let h = firwin(51, 0.08);
        assert_eq!(h.len(), 51);
        assert!((h.iter().sum::<f64>() - 1.0).abs() < 1e-12);
        for i in 0..25 {
            assert!((h[i] - h[50 - i]).abs() < 1e-12);
        }
        assert!(h[25] > h[0]);
    }

    #[test]
    fn rrc_peaks_at_center() {
        let h = rrcosfilter(101, 0.4, 0.01, 1000.0);
        let (peak, _) = h
            .iter()
            .enumerate()
            .fold((0, f64::MIN), |acc, (i, &v)| if v > acc.1 { (i, v) } else { acc });
        assert!((49..=51).contains(&peak));
        let h0 = rrcosfilter(2, 0.4, 0.01, 1000.0);
        assert!((h0[1] - (1.0 - 0.4 + 1.6 / PI)).abs() < 1e-12);
    }

    #[test]
    fn upfirdn_and_convolve_lengths() {
        let y = upfirdn(&[1.0, 0.5], &[1.0, 2.0, 3.0], 3);
        assert_eq!(y, vec![1.0, 0.5, 0.0, 2.0, 1.0, 0.0, 3.0, 1.5]);
        assert_eq!(convolve(&[1.0, 1.0], &[1.0, 1.0]), vec![1.0, 2.0, 1.0]);
    }

    #[test]
    fn lfilter_is_causal() {
        let y = lfilter(&[0.5, 0.5], &[2.0, 4.0, 6.0]);
        assert_eq!(y, vec![1.0, 3.0, 5.0]);
    }
}
