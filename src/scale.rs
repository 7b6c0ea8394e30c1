use serde::Serialize;

use crate::error::{ChartError, ChartWarning};
use crate::group::OrderedKeys;
use crate::palette::ColorPalette;

// =============================================================================
// Linear Scale
// =============================================================================

/// Affine map from a continuous domain to a pixel range
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LinearScale {
    domain: (f64, f64),
    range: (f64, f64),
}

impl LinearScale {
    pub fn new(domain: (f64, f64), range: (f64, f64)) -> Self {
        Self { domain, range }
    }

    pub fn domain(&self) -> (f64, f64) {
        self.domain
    }

    pub fn range(&self) -> (f64, f64) {
        self.range
    }

    /// Map a domain value to the range. A degenerate domain maps every
    /// value to the middle of the range.
    pub fn map(&self, value: f64) -> f64 {
        let (d0, d1) = self.domain;
        let (r0, r1) = self.range;
        if d0 == d1 {
            return (r0 + r1) / 2.0;
        }
        let t = (value - d0) / (d1 - d0);
        r0 + t * (r1 - r0)
    }

    /// Extend the domain outward to round values so that roughly `count`
    /// ticks land on its ends
    pub fn nice(self, count: usize) -> Self {
        let (mut i0, mut i1) = (0, 1);
        let mut d = [self.domain.0, self.domain.1];
        let (mut start, mut stop) = (d[i0], d[i1]);
        if stop < start {
            std::mem::swap(&mut start, &mut stop);
            std::mem::swap(&mut i0, &mut i1);
        }
        if !(start < stop) || !start.is_finite() || !stop.is_finite() || count == 0 {
            return self;
        }

        let mut prestep: Option<f64> = None;
        for _ in 0..10 {
            let step = tick_increment(start, stop, count);
            if prestep == Some(step) {
                d[i0] = start;
                d[i1] = stop;
                return Self { domain: (d[0], d[1]), range: self.range };
            } else if step > 0.0 {
                start = (start / step).floor() * step;
                stop = (stop / step).ceil() * step;
            } else if step < 0.0 {
                start = (start * step).ceil() / step;
                stop = (stop * step).floor() / step;
            } else {
                break;
            }
            prestep = Some(step);
        }
        self
    }

    /// Round tick values covering the domain, roughly `count` of them
    pub fn ticks(&self, count: usize) -> Vec<f64> {
        let (mut start, mut stop) = self.domain;
        if count == 0 || !start.is_finite() || !stop.is_finite() {
            return Vec::new();
        }
        if start == stop {
            return vec![start];
        }
        let reverse = stop < start;
        if reverse {
            std::mem::swap(&mut start, &mut stop);
        }

        let (i1, i2, inc) = tick_bounds(start, stop, count);
        if !(i2 >= i1) {
            return Vec::new();
        }
        let n = (i2 - i1 + 1.0) as usize;
        let mut ticks: Vec<f64> = (0..n)
            .map(|i| {
                let k = i1 + i as f64;
                if inc < 0.0 { k / -inc } else { k * inc }
            })
            .collect();
        if reverse {
            ticks.reverse();
        }
        ticks
    }
}

const E10: f64 = 7.0710678118654755; // sqrt(50)
const E5: f64 = 3.1622776601683795; // sqrt(10)
const E2: f64 = std::f64::consts::SQRT_2;

fn step_factor(error: f64) -> f64 {
    if error >= E10 {
        10.0
    } else if error >= E5 {
        5.0
    } else if error >= E2 {
        2.0
    } else {
        1.0
    }
}

/// Tick step for `count` ticks over `[start, stop]`. Negative results
/// encode the reciprocal of a sub-unit step.
fn tick_increment(start: f64, stop: f64, count: usize) -> f64 {
    let step = (stop - start) / count as f64;
    let power = step.log10().floor();
    let factor = step_factor(step / 10f64.powf(power));
    if power >= 0.0 {
        factor * 10f64.powf(power)
    } else {
        -10f64.powf(-power) / factor
    }
}

fn tick_bounds(start: f64, stop: f64, count: usize) -> (f64, f64, f64) {
    let step = (stop - start) / count as f64;
    let power = step.log10().floor();
    let factor = step_factor(step / 10f64.powf(power));

    if power < 0.0 {
        let inc = 10f64.powf(-power) / factor;
        let mut i1 = (start * inc).round();
        let mut i2 = (stop * inc).round();
        if i1 / inc < start { i1 += 1.0; }
        if i2 / inc > stop { i2 -= 1.0; }
        (i1, i2, -inc)
    } else {
        let inc = 10f64.powf(power) * factor;
        let mut i1 = (start / inc).round();
        let mut i2 = (stop / inc).round();
        if i1 * inc < start { i1 += 1.0; }
        if i2 * inc > stop { i2 -= 1.0; }
        (i1, i2, inc)
    }
}

/// Min and max of the finite values, `None` when there are none
pub fn extent<I: IntoIterator<Item = f64>>(values: I) -> Option<(f64, f64)> {
    values
        .into_iter()
        .filter(|v| v.is_finite())
        .fold(None, |acc, v| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        })
}

// =============================================================================
// Band Scale
// =============================================================================

/// Discrete keys mapped to equal-width bands of a pixel range.
///
/// The range is divided into `n - inner + 2 * outer` steps. Each band is
/// `step * (1 - inner)` wide, neighbouring bands are one step apart and the
/// leftover space is placed according to `align` (0.5 centres the bands).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BandScale {
    domain: OrderedKeys<String>,
    range: (f64, f64),
    padding_inner: f64,
    padding_outer: f64,
    align: f64,
    step: f64,
    bandwidth: f64,
    start: f64,
}

impl BandScale {
    /// Band scale with no padding
    pub fn new<I>(domain: I, range: (f64, f64)) -> Self
    where
        I: IntoIterator<Item = String>,
    {
        let mut scale = Self {
            domain: domain.into_iter().collect(),
            range,
            padding_inner: 0.0,
            padding_outer: 0.0,
            align: 0.5,
            step: 0.0,
            bandwidth: 0.0,
            start: range.0,
        };
        scale.rescale();
        scale
    }

    /// Reserve the fraction `padding` of every step as gap, half before
    /// and half after each band. With `n` keys the step is exactly
    /// `span / n`.
    pub fn with_padding(mut self, padding: f64) -> Self {
        let padding = clamp_inner(padding);
        self.padding_inner = padding;
        self.padding_outer = padding / 2.0;
        self.rescale();
        self
    }

    fn rescale(&mut self) {
        let n = self.domain.len() as f64;
        let (r0, r1) = self.range;
        let (start, stop) = if r1 < r0 { (r1, r0) } else { (r0, r1) };

        let steps = (n - self.padding_inner + self.padding_outer * 2.0).max(1.0);
        self.step = (stop - start) / steps;
        self.start = start + (stop - start - self.step * (n - self.padding_inner)) * self.align;
        self.bandwidth = self.step * (1.0 - self.padding_inner);
    }

    /// Left edge of the band for `key`
    pub fn position(&self, key: &str) -> Option<f64> {
        let idx = self.domain.position(key)?;
        let slot = if self.range.1 < self.range.0 {
            self.domain.len() - 1 - idx
        } else {
            idx
        };
        Some(self.start + self.step * slot as f64)
    }

    /// Like `position`, but a key outside the domain is an error
    pub fn locate(&self, key: &str) -> Result<f64, ChartError> {
        self.position(key).ok_or_else(|| ChartError::UnknownKey {
            key: key.to_string(),
            scale: "band",
        })
    }

    pub fn bandwidth(&self) -> f64 {
        self.bandwidth
    }

    pub fn step(&self) -> f64 {
        self.step
    }

    pub fn domain(&self) -> &[String] {
        self.domain.as_slice()
    }

    pub fn range(&self) -> (f64, f64) {
        self.range
    }
}

fn clamp_inner(padding: f64) -> f64 {
    if padding.is_finite() {
        padding.clamp(0.0, 0.999)
    } else {
        0.0
    }
}

// =============================================================================
// Ordinal (Color) Scale
// =============================================================================

/// Discrete keys mapped to palette colors by domain position
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrdinalScale {
    domain: OrderedKeys<String>,
    palette: Vec<String>,
}

impl OrdinalScale {
    pub fn new<I>(domain: I, palette: &ColorPalette) -> Self
    where
        I: IntoIterator<Item = String>,
    {
        Self {
            domain: domain.into_iter().collect(),
            palette: palette.colors().to_vec(),
        }
    }

    pub fn color(&self, key: &str) -> Result<&str, ChartError> {
        let idx = self.domain.position(key).ok_or_else(|| ChartError::UnknownKey {
            key: key.to_string(),
            scale: "color",
        })?;
        Ok(&self.palette[idx % self.palette.len()])
    }

    /// Reported when more keys than colors force colors to repeat
    pub fn exhaustion(&self) -> Option<ChartWarning> {
        if self.domain.len() > self.palette.len() {
            Some(ChartWarning::PaletteExhausted {
                keys: self.domain.len(),
                colors: self.palette.len(),
            })
        } else {
            None
        }
    }

    pub fn domain(&self) -> &[String] {
        self.domain.as_slice()
    }

    pub fn palette(&self) -> &[String] {
        &self.palette
    }
}
