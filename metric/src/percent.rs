//! This module defines the `PercentMetric` struct. As the name implies, this
//! struct is geared toward tracking percentages. Internally it is represented
//! using a numerator and denominator counter.

use serde::{Deserialize, Serialize};
use std::ops::{Add, AddAssign};

/// Use this struct to keep track of metrics which can be represented
/// as a fraction with numerator and denominator of type `i64`
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct PercentMetric {
    /// Numerator
    pub numerator: i64,
    /// Denominator
    pub denominator: i64,
}

impl PercentMetric {
    /// Generate a `PercentMetric` from a numerator and a denominator
    ///
    /// # Example
    /// ```rust
    /// use metric::PercentMetric;
    /// let c1 = PercentMetric::from_parts(50, 100);
    /// let mut c2 = PercentMetric::default();
    /// c2.increment_by(50, true);
    /// c2.increment_by(50, false);
    /// assert!(c1 == c2);
    /// ```
    pub fn from_parts<T>(num: T, den: T) -> Self
    where
        T: Into<i64>,
    {
        PercentMetric {
            numerator: num.into(),
            denominator: den.into(),
        }
    }

    /// Add a single observation. The denominator is incremented by 1
    /// and the numerator is incremented if the filter is true
    pub fn increment(&mut self, filter: bool) {
        self.increment_by(1, filter);
    }

    /// Increment the denominator by the specified value. Increment the
    /// numerator if the filter is true
    pub fn increment_by<T>(&mut self, val: T, filter: bool)
    where
        T: Copy + Into<i64>,
    {
        self.denominator += val.into();
        if filter {
            self.numerator += val.into();
        }
    }

    /// Return the fraction as an `Option`. It is `None` if the denominator
    /// is zero
    ///
    /// # Example
    /// ```rust
    /// use metric::PercentMetric;
    /// let mut c = PercentMetric::default();
    /// assert!(c.fraction().is_none());
    /// c.increment_by(10, false);
    /// c.increment_by(10, true);
    /// assert!(c.fraction() == Some(0.5f64));
    /// ```
    pub fn fraction(&self) -> Option<f64> {
        if self.denominator == 0 {
            None
        } else {
            Some((self.numerator as f64) / (self.denominator as f64))
        }
    }

    /// Return the fraction as a whole percentage rounded toward zero, or
    /// `None` if the denominator is zero.
    ///
    /// # Example
    /// ```rust
    /// use metric::PercentMetric;
    /// let c = PercentMetric::from_parts(2, 3);
    /// assert_eq!(c.floor_percent(), Some(66));
    /// ```
    pub fn floor_percent(&self) -> Option<u32> {
        if self.denominator == 0 {
            None
        } else {
            Some((self.numerator * 100 / self.denominator) as u32)
        }
    }

    /// Fold the counts of the other metric into this one.
    pub fn merge(&mut self, other: PercentMetric) {
        self.numerator += other.numerator;
        self.denominator += other.denominator;
    }
}

impl AddAssign for PercentMetric {
    fn add_assign(&mut self, other: PercentMetric) {
        self.merge(other);
    }
}

impl Add for PercentMetric {
    type Output = PercentMetric;

    fn add(mut self, other: PercentMetric) -> PercentMetric {
        self += other;
        self
    }
}

/// A convenience conversion from a tuple with two elements of a type which
/// can be converted to an `i64`.
impl<T> From<(T, T)> for PercentMetric
where
    T: Into<i64>,
{
    fn from((num, den): (T, T)) -> Self {
        PercentMetric::from_parts(num, den)
    }
}
