use log::debug;

use crate::error::{ChartError, Result};

// Thresholds between 1, 2, 5 and 10 tick multiples
const E10: f64 = 7.0710678118654755; // sqrt(50)
const E5: f64 = 3.1622776601683795; // sqrt(10)
const E2: f64 = 1.4142135623730951; // sqrt(2)

const DEFAULT_TICKS: usize = 10;

// =============================================================================
// Linear Scale
// =============================================================================

/// Continuous mapping from a numeric domain to a pixel range.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearScale {
    domain: (f64, f64),
    range: (f64, f64),
}

/// Build a linear scale whose domain is niced before mapping.
pub fn linear_scale(domain_min: f64, domain_max: f64, range_lo: f64, range_hi: f64) -> Result<LinearScale> {
    let scale = LinearScale::new((domain_min, domain_max), (range_lo, range_hi))?.nice(DEFAULT_TICKS);
    debug!(
        "linear scale [{}, {}] niced to [{}, {}] -> [{}, {}]",
        domain_min, domain_max, scale.domain.0, scale.domain.1, range_lo, range_hi
    );
    Ok(scale)
}

impl LinearScale {
    /// Build a scale over the exact domain given.
    pub fn new(domain: (f64, f64), range: (f64, f64)) -> Result<Self> {
        let (min, max) = domain;
        if !min.is_finite() || !max.is_finite() || min == max {
            return Err(ChartError::DegenerateDomain { min, max });
        }
        Ok(Self { domain, range })
    }

    pub fn domain(&self) -> (f64, f64) {
        self.domain
    }

    pub fn range(&self) -> (f64, f64) {
        self.range
    }

    pub fn map(&self, v: f64) -> f64 {
        let (d0, d1) = self.domain;
        let (r0, r1) = self.range;
        r0 + (v - d0) / (d1 - d0) * (r1 - r0)
    }

    pub fn invert(&self, px: f64) -> f64 {
        let (d0, d1) = self.domain;
        let (r0, r1) = self.range;
        d0 + (px - r0) / (r1 - r0) * (d1 - d0)
    }

    /// Extend the domain outward to multiples of the tick step for `count` ticks.
    pub fn nice(mut self, count: usize) -> Self {
        let (mut start, mut stop) = self.domain;
        let reversed = stop < start;
        if reversed {
            std::mem::swap(&mut start, &mut stop);
        }

        let mut prestep = 0.0;
        for _ in 0..10 {
            let step = tick_increment(start, stop, count as f64);
            if step == prestep {
                break;
            } else if step > 0.0 {
                start = (start / step).floor() * step;
                stop = (stop / step).ceil() * step;
            } else if step < 0.0 {
                start = (start * step).ceil() / step;
                stop = (stop * step).floor() / step;
            } else {
                break;
            }
            prestep = step;
        }

        self.domain = if reversed { (stop, start) } else { (start, stop) };
        self
    }

    /// Round tick values inside the domain, roughly `count` of them.
    pub fn ticks(&self, count: usize) -> Vec<f64> {
        ticks(self.domain.0, self.domain.1, count as f64)
    }
}

fn tick_spec(start: f64, stop: f64, count: f64) -> (f64, f64, f64) {
    let step = (stop - start) / count.max(0.0);
    let power = step.log10().floor();
    let error = step / 10f64.powf(power);
    let factor = if error >= E10 {
        10.0
    } else if error >= E5 {
        5.0
    } else if error >= E2 {
        2.0
    } else {
        1.0
    };

    let (mut i1, mut i2, inc);
    if power < 0.0 {
        let inc_pos = 10f64.powf(-power) / factor;
        i1 = (start * inc_pos).round();
        i2 = (stop * inc_pos).round();
        if i1 / inc_pos < start {
            i1 += 1.0;
        }
        if i2 / inc_pos > stop {
            i2 -= 1.0;
        }
        inc = -inc_pos;
    } else {
        inc = 10f64.powf(power) * factor;
        i1 = (start / inc).round();
        i2 = (stop / inc).round();
        if i1 * inc < start {
            i1 += 1.0;
        }
        if i2 * inc > stop {
            i2 -= 1.0;
        }
    }

    if i2 < i1 && (0.5..2.0).contains(&count) {
        return tick_spec(start, stop, count * 2.0);
    }
    (i1, i2, inc)
}

/// Step between ticks; negative values encode `1 / step` for sub-unit steps.
fn tick_increment(start: f64, stop: f64, count: f64) -> f64 {
    tick_spec(start, stop, count).2
}

/// Evenly spaced round values between `start` and `stop` inclusive.
pub fn ticks(start: f64, stop: f64, count: f64) -> Vec<f64> {
    if !(count > 0.0) || !start.is_finite() || !stop.is_finite() {
        return Vec::new();
    }
    if start == stop {
        return vec![start];
    }
    let reverse = stop < start;
    let (lo, hi) = if reverse { (stop, start) } else { (start, stop) };

    let (i1, i2, inc) = tick_spec(lo, hi, count);
    if !(i2 >= i1) {
        return Vec::new();
    }

    let n = (i2 - i1 + 1.0) as usize;
    let mut out: Vec<f64> = (0..n)
        .map(|i| {
            let k = i1 + i as f64;
            if inc < 0.0 { k / -inc } else { k * inc }
        })
        .collect();
    if reverse {
        out.reverse();
    }
    out
}

// =============================================================================
// Band Scale
// =============================================================================

/// Categorical mapping from keys to equal-width bands.
#[derive(Debug, Clone, PartialEq)]
pub struct BandScale<K> {
    keys: Vec<K>,
    start: f64,
    step: f64,
    bandwidth: f64,
}

/// Build a band scale over `keys` (duplicates collapse to their first occurrence).
pub fn band_scale<K>(keys: &[K], range_lo: f64, range_hi: f64, padding: f64) -> Result<BandScale<K>>
where
    K: Copy + PartialEq,
{
    if !(0.0..1.0).contains(&padding) {
        return Err(ChartError::InvalidParameter { name: "band padding", value: padding });
    }

    let mut unique: Vec<K> = Vec::with_capacity(keys.len());
    for &k in keys {
        if !unique.contains(&k) {
            unique.push(k);
        }
    }
    if unique.is_empty() {
        return Err(ChartError::EmptyInput { what: "band scale" });
    }

    let n = unique.len() as f64;
    let (padding_inner, padding_outer, align) = (padding, padding, 0.5);
    let step = (range_hi - range_lo) / (n - padding_inner + padding_outer * 2.0).max(1.0);
    let start = range_lo + (range_hi - range_lo - step * (n - padding_inner)) * align;
    let bandwidth = step * (1.0 - padding_inner);

    Ok(BandScale { keys: unique, start, step, bandwidth })
}

impl<K: Copy + PartialEq> BandScale<K> {
    pub fn keys(&self) -> &[K] {
        &self.keys
    }

    pub fn bandwidth(&self) -> f64 {
        self.bandwidth
    }

    pub fn step(&self) -> f64 {
        self.step
    }

    /// Start offset of the band for `key`, `None` for unknown keys.
    pub fn position(&self, key: K) -> Option<f64> {
        self.keys
            .iter()
            .position(|&k| k == key)
            .map(|i| self.start + self.step * i as f64)
    }

    pub fn center(&self, key: K) -> Option<f64> {
        self.position(key).map(|p| p + self.bandwidth / 2.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_linear_maps_range() {
        let s = linear_scale(0.0, 100.0, 0.0, 400.0).unwrap();
        assert_eq!(s.map(0.0), 0.0);
        assert_eq!(s.map(50.0), 200.0);
        assert_eq!(s.map(100.0), 400.0);
        assert_eq!(s.invert(200.0), 50.0);
    }

    #[test]
    fn test_linear_inverted_range() {
        let s = linear_scale(0.0, 40.0, 260.0, 20.0).unwrap();
        assert_eq!(s.map(0.0), 260.0);
        assert_eq!(s.map(40.0), 20.0);
    }

    #[test]
    fn test_nice_rounds_outward() {
        let s = linear_scale(0.0, 97.3, 0.0, 1.0).unwrap();
        assert_eq!(s.domain(), (0.0, 100.0));
        let s = linear_scale(0.0, 0.83, 0.0, 1.0).unwrap();
        assert_eq!(s.domain(), (0.0, 0.9));
        let s = linear_scale(3.0, 1234.0, 0.0, 1.0).unwrap();
        assert_eq!(s.domain(), (0.0, 1300.0));
    }

    #[test]
    fn test_degenerate_domain() {
        assert_eq!(
            linear_scale(5.0, 5.0, 0.0, 1.0),
            Err(ChartError::DegenerateDomain { min: 5.0, max: 5.0 })
        );
        assert!(LinearScale::new((0.0, f64::INFINITY), (0.0, 1.0)).is_err());
    }

    #[test]
    fn test_ticks() {
        assert_eq!(ticks(0.0, 10.0, 10.0), (0..=10).map(|i| i as f64).collect::<Vec<_>>());
        assert_eq!(ticks(0.0, 1.0, 5.0), vec![0.0, 0.2, 0.4, 0.6, 0.8, 1.0]);
        assert_eq!(ticks(0.0, 100.0, 40.0).len(), 51);
        assert_eq!(ticks(10.0, 0.0, 2.0), vec![10.0, 5.0, 0.0]);
        assert_eq!(ticks(3.0, 3.0, 10.0), vec![3.0]);
        assert!(ticks(0.0, 1.0, 0.0).is_empty());
    }

    #[test]
    fn test_band_without_padding() {
        let b = band_scale(&['A', 'B', 'C'], 0.0, 300.0, 0.0).unwrap();
        assert_eq!(b.bandwidth(), 100.0);
        let starts: Vec<f64> = b.keys().iter().map(|&k| b.position(k).unwrap()).collect();
        assert_eq!(starts, vec![0.0, 100.0, 200.0]);
        assert_eq!(b.center('B'), Some(150.0));
        assert_eq!(b.position('Z'), None);
    }

    #[test]
    fn test_band_with_padding() {
        let b = band_scale(&[1, 2], 0.0, 100.0, 0.5).unwrap();
        // step = 100 / (2 - 0.5 + 1) = 40
        assert_eq!(b.step(), 40.0);
        assert_eq!(b.bandwidth(), 20.0);
        assert_eq!(b.position(1), Some(20.0));
        assert_eq!(b.position(2), Some(60.0));
    }

    #[test]
    fn test_band_collapses_duplicates() {
        let b = band_scale(&[2001, 2000, 2001, 2002], 0.0, 300.0, 0.0).unwrap();
        assert_eq!(b.keys(), &[2001, 2000, 2002]);
    }

    #[test]
    fn test_band_errors() {
        assert!(band_scale::<i32>(&[], 0.0, 1.0, 0.1).is_err());
        assert!(band_scale(&[1], 0.0, 1.0, 1.0).is_err());
        assert!(band_scale(&[1], 0.0, 1.0, -0.1).is_err());
    }
}
