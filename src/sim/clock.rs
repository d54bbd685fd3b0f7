//! Accumulator-based tick gating
//!
//! The host loop supplies one wall-clock delta per frame. Each component owns a
//! gate and decides independently whether enough time has built up to run its
//! own fixed-rate step, so logical ticks may run slower than frames but never
//! faster.

/// Fires once the accumulated frame time reaches `interval_ms`
#[derive(Debug, Clone)]
pub struct TickGate {
    interval_ms: f64,
    accumulated_ms: f64,
}

impl TickGate {
    pub fn new(interval_ms: f64) -> Self {
        Self {
            interval_ms,
            accumulated_ms: 0.0,
        }
    }

    /// Add a frame delta. Returns the time accumulated since the previous
    /// firing when the gate opens; the accumulator then restarts from zero.
    pub fn advance(&mut self, delta_ms: f64) -> Option<f64> {
        self.accumulated_ms += delta_ms;
        if self.accumulated_ms >= self.interval_ms {
            let elapsed = self.accumulated_ms;
            self.accumulated_ms = 0.0;
            Some(elapsed)
        } else {
            None
        }
    }

    pub fn interval_ms(&self) -> f64 {
        self.interval_ms
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gate_waits_for_interval() {
        let mut gate = TickGate::new(20.0);
        assert_eq!(gate.advance(8.0), None);
        assert_eq!(gate.advance(8.0), None);
        assert_eq!(gate.advance(8.0), Some(24.0));
        // Restarts from zero, leftover is not carried
        assert_eq!(gate.advance(8.0), None);
    }

    #[test]
    fn test_gate_never_fires_twice_per_frame() {
        let mut gate = TickGate::new(1000.0 / 60.0);
        assert_eq!(gate.advance(100.0), Some(100.0));
        assert_eq!(gate.advance(0.0), None);
    }
}
