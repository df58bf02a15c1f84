//! Count-up number animation.

use std::time::Duration;
use thiserror::Error;

/// Ticks from zero to the target.
pub const COUNTER_STEPS: f64 = 40.0;
pub const TICK: Duration = Duration::from_millis(30);

#[derive(Error, Debug, PartialEq)]
pub enum CounterError {
    #[error("Counter target '{0}' is not a number")]
    InvalidTarget(String),
}

/// Counts from 0 to `target` in equal steps, one per [`TICK`].
#[derive(Debug, Clone, PartialEq)]
pub struct CountUp {
    target: f64,
    step: f64,
    prefix: String,
    suffix: String,
    decimal: bool,
    current: f64,
    done: bool,
    carry: Duration,
}

impl CountUp {
    pub fn new(target: f64, prefix: impl Into<String>, suffix: impl Into<String>) -> Self {
        Self {
            target,
            step: target / COUNTER_STEPS,
            prefix: prefix.into(),
            suffix: suffix.into(),
            decimal: target.fract() != 0.0,
            current: 0.0,
            done: false,
            carry: Duration::ZERO,
        }
    }

    /// Parse the target from its attribute text, e.g. `"2.5"` or `"1200"`.
    pub fn parse(
        target: &str,
        prefix: impl Into<String>,
        suffix: impl Into<String>,
    ) -> Result<Self, CounterError> {
        let value: f64 = target
            .trim()
            .parse()
            .map_err(|_| CounterError::InvalidTarget(target.to_string()))?;
        if !value.is_finite() {
            return Err(CounterError::InvalidTarget(target.to_string()));
        }
        Ok(Self::new(value, prefix, suffix))
    }

    pub fn is_done(&self) -> bool {
        self.done
    }

    pub fn value(&self) -> f64 {
        self.current
    }

    /// One interval: add a step, clamp at the target.
    pub fn tick(&mut self) {
        if self.done {
            return;
        }
        self.current += self.step;
        if self.current >= self.target {
            self.current = self.target;
            self.done = true;
        }
    }

    /// Run every whole tick that fits in `elapsed` plus leftover time from
    /// earlier calls.
    pub fn advance(&mut self, elapsed: Duration) {
        self.carry += elapsed;
        while self.carry >= TICK && !self.done {
            self.carry -= TICK;
            self.tick();
        }
    }

    /// Display text: one decimal for fractional targets, otherwise a
    /// rounded integer with thousands separators.
    pub fn text(&self) -> String {
        let number = if self.decimal {
            format!("{:.1}", self.current)
        } else {
            group_thousands(round_half_up(self.current))
        };
        format!("{}{}{}", self.prefix, number, self.suffix)
    }
}

fn round_half_up(v: f64) -> i64 {
    (v + 0.5).floor() as i64
}

fn group_thousands(n: i64) -> String {
    let digits = n.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if n < 0 {
        grouped.push('-');
    }
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    grouped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_integer_counter_reaches_target_in_40_ticks() {
        let mut counter = CountUp::new(1200.0, "$", "K");
        assert_eq!(counter.text(), "$0K");
        counter.tick();
        assert_eq!(counter.text(), "$30K");
        for _ in 0..39 {
            counter.tick();
        }
        assert!(counter.is_done());
        assert_eq!(counter.text(), "$1,200K");

        counter.tick();
        assert_eq!(counter.value(), 1200.0);
    }

    #[test]
    fn test_decimal_counter_keeps_one_decimal() {
        let mut counter = CountUp::parse("2.5", "", "x").unwrap();
        counter.tick();
        assert_eq!(counter.text(), "0.1x");
        counter.advance(Duration::from_secs(5));
        assert_eq!(counter.text(), "2.5x");
    }

    #[test]
    fn test_whole_number_with_decimal_point_counts_as_integer() {
        let counter = CountUp::parse("12.0", "", "").unwrap();
        assert_eq!(counter.text(), "0");
        assert!(!counter.decimal);
    }

    #[test]
    fn test_advance_carries_partial_ticks() {
        let mut counter = CountUp::new(40.0, "", "");
        counter.advance(Duration::from_millis(20));
        assert_eq!(counter.value(), 0.0);
        counter.advance(Duration::from_millis(20));
        assert_eq!(counter.value(), 1.0);
        counter.advance(Duration::from_millis(65));
        assert_eq!(counter.value(), 3.0);
    }

    #[test]
    fn test_invalid_target() {
        assert_eq!(
            CountUp::parse("abc", "", ""),
            Err(CounterError::InvalidTarget("abc".into()))
        );
    }

    #[test]
    fn test_group_thousands() {
        assert_eq!(group_thousands(0), "0");
        assert_eq!(group_thousands(999), "999");
        assert_eq!(group_thousands(1000), "1,000");
        assert_eq!(group_thousands(1234567), "1,234,567");
        assert_eq!(group_thousands(-45000), "-45,000");
    }
}
