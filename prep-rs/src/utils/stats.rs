use crate::prelude::*;
use getset::CopyGetters;
use serde::{Deserialize, Serialize};

pub trait Stats {
    fn add(&mut self, x: Real);
    fn add_many<I>(&mut self, xs: I)
    where
        I: IntoIterator<Item = Real>,
    {
        for x in xs {
            self.add(x);
        }
    }
    fn size(&self) -> usize;
    fn total(&self) -> Real;
    fn min(&self) -> Real;
    fn max(&self) -> Real;
    fn var(&self) -> Real;
    fn std(&self) -> Real {
        self.var().sqrt()
    }
    fn mean(&self) -> Real {
        self.total() / self.size() as Real
    }
    fn stats(&self) -> PointStats {
        PointStats {
            mean: self.mean(),
            std: self.std(),
            min: self.min(),
            max: self.max(),
            size: self.size(),
        }
    }
}

/// Accumulates the first two raw moments and the range of a stream of
/// values. An empty accumulator has NaN mean and variance.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct PointStatsAcc {
    n: usize,
    m1: Real,
    m2: Real,
    min: Real,
    max: Real,
}

impl PointStatsAcc {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Stats for PointStatsAcc {
    fn add(&mut self, x: Real) {
        self.n += 1;
        self.m1 += x;
        self.m2 += x * x;
        self.min = Real::min(x, self.min);
        self.max = Real::max(x, self.max);
    }

    fn total(&self) -> Real {
        self.m1
    }

    fn mean(&self) -> Real {
        if self.n == 0 {
            return NAN;
        }
        self.m1 / self.n as Real
    }

    /// Population variance, clipped at zero to absorb rounding errors.
    fn var(&self) -> Real {
        let m = self.mean();
        (self.m2 / self.n as Real - sqr(m)).max(0.0)
    }

    fn min(&self) -> Real {
        self.min
    }
    fn max(&self) -> Real {
        self.max
    }
    fn size(&self) -> usize {
        self.n
    }
}

impl Default for PointStatsAcc {
    fn default() -> Self {
        PointStatsAcc {
            n: 0,
            m1: 0.,
            m2: 0.,
            min: INF,
            max: -INF,
        }
    }
}

#[inline]
pub fn sqr(x: Real) -> Real {
    x * x
}

#[derive(Debug, Copy, Clone, PartialEq, Deserialize, Serialize, CopyGetters)]
#[getset(get_copy = "pub")]
pub struct PointStats {
    mean: Real,
    std: Real,
    min: Real,
    max: Real,
    size: usize,
}

impl PointStats {
    /// Lower end of the mean ± k std envelope.
    pub fn lower(&self, k: Real) -> Real {
        self.mean - k * self.std
    }

    /// Upper end of the mean ± k std envelope.
    pub fn upper(&self, k: Real) -> Real {
        self.mean + k * self.std
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_approx_eq::assert_approx_eq;

    #[test]
    fn simple_stats() {
        let mut acc = PointStatsAcc::new();
        acc.add(0.);
        acc.add_many(vec![1., 2., 3., 4.]);
        let st = acc.stats();
        assert_eq!(st.size(), 5);
        assert_approx_eq!(st.mean(), 2.0, 0.001);
        assert_approx_eq!(st.std(), 1.4142, 0.001);
        assert_approx_eq!(st.min(), 0.0);
        assert_approx_eq!(st.max(), 4.0);
        assert_approx_eq!(st.lower(1.0), 0.5858, 0.001);
        assert_approx_eq!(st.upper(3.0), 6.2426, 0.001);
    }

    #[test]
    fn constant_stream_has_no_spread() {
        let mut acc = PointStatsAcc::new();
        acc.add_many(std::iter::repeat(0.1).take(7));
        assert_approx_eq!(acc.std(), 0.0, 1e-6);
        assert_approx_eq!(acc.mean(), 0.1);
    }

    #[test]
    fn empty_stream() {
        let acc = PointStatsAcc::new();
        assert!(acc.mean().is_nan());
        assert_eq!(acc.size(), 0);
    }
}
