use crate::dsp::interpolate::lerp;

/*
Multi-Point Envelopes
=====================

An envelope is a time-varying volume multiplier. Multiplying a waveform by
an envelope shapes how the note starts, holds and ends.

Vocabulary
----------

  point       A (time, volume) pair. Times are seconds since the note (or
              the current envelope stage) began.

  segment     The straight line between two adjacent points.

  pop         An audible click caused by the signal jumping instantly to or
              from a non-zero value. Starting and ending every shaped sound
              at (or very near) zero volume is how we avoid them.


The Shape: Straight Lines Between Points
----------------------------------------

  Volume
    1.0 ┐   B─────────C
        │  ╱           ╲
        │ ╱             ╲
    0.0 A╱───────────────D──→ Time

    before A          → volume of A
    between A and B   → lerp(A.volume, B.volume, elapsed fraction)
    after D           → volume of D

The 2/3/4/5-point helpers below are just fixed-size calls into `envelope`.
Typical uses:

  2 points   fade in / fade out (key press, key release)
  3 points   bell: instant attack, long decay
  4 points   attack, hold, decay
  5 points   drum/cymbal: attack, hold, fast decay, slow tail


Degenerate Segments
-------------------

Two adjacent points with the same time form a vertical step. We only ever
interpolate across a segment whose end time is strictly greater than the
query time, which in turn is at least the start time, so the division by
the segment length never sees zero.
*/

/// One control point of an envelope.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnvelopePoint {
    pub time: f32,
    pub volume: f32,
}

impl EnvelopePoint {
    pub const fn new(time: f32, volume: f32) -> Self {
        Self { time, volume }
    }
}

impl From<(f32, f32)> for EnvelopePoint {
    fn from((time, volume): (f32, f32)) -> Self {
        Self { time, volume }
    }
}

/// Evaluate a piecewise-linear envelope with points in ascending time order.
///
/// An empty point list is silent.
pub fn envelope(time: f32, points: &[EnvelopePoint]) -> f32 {
    let Some(first) = points.first() else {
        return 0.0;
    };

    if time <= first.time {
        return first.volume;
    }

    for pair in points.windows(2) {
        let (start, end) = (pair[0], pair[1]);
        if time < end.time {
            let percent = (time - start.time) / (end.time - start.time);
            return lerp(start.volume, end.volume, percent);
        }
    }

    points[points.len() - 1].volume
}

#[inline]
pub fn envelope_2pt(time: f32, p0: (f32, f32), p1: (f32, f32)) -> f32 {
    envelope(time, &[p0.into(), p1.into()])
}

#[inline]
pub fn envelope_3pt(time: f32, p0: (f32, f32), p1: (f32, f32), p2: (f32, f32)) -> f32 {
    envelope(time, &[p0.into(), p1.into(), p2.into()])
}

#[inline]
pub fn envelope_4pt(
    time: f32,
    p0: (f32, f32),
    p1: (f32, f32),
    p2: (f32, f32),
    p3: (f32, f32),
) -> f32 {
    envelope(time, &[p0.into(), p1.into(), p2.into(), p3.into()])
}

#[inline]
pub fn envelope_5pt(
    time: f32,
    p0: (f32, f32),
    p1: (f32, f32),
    p2: (f32, f32),
    p3: (f32, f32),
    p4: (f32, f32),
) -> f32 {
    envelope(time, &[p0.into(), p1.into(), p2.into(), p3.into(), p4.into()])
}

/// Bend a 0..1 value towards 1 (`amount` > 0.5) or towards 0 (< 0.5).
///
/// Schlick's bias curve: `bias(t, 0.5) == t`, and both end points are fixed.
/// Used to reshape an envelope without moving where it starts and ends.
#[inline]
pub fn bias(t: f32, amount: f32) -> f32 {
    t / ((1.0 / amount - 2.0) * (1.0 - t) + 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SHAPE: [EnvelopePoint; 5] = [
        EnvelopePoint::new(0.0, 0.0),
        EnvelopePoint::new(0.01, 1.0),
        EnvelopePoint::new(0.02, 1.0),
        EnvelopePoint::new(0.04, 0.2),
        EnvelopePoint::new(0.215, 0.0),
    ];

    #[test]
    fn endpoints_return_their_volumes() {
        assert_eq!(envelope(0.0, &SHAPE), 0.0);
        assert_eq!(envelope(0.215, &SHAPE), 0.0);
        assert_eq!(envelope(-1.0, &SHAPE), 0.0);
        assert_eq!(envelope(5.0, &SHAPE), 0.0);

        let bell = [EnvelopePoint::new(0.5, 0.3), EnvelopePoint::new(1.0, 0.8)];
        assert_eq!(envelope(0.0, &bell), 0.3);
        assert_eq!(envelope(0.5, &bell), 0.3);
        assert_eq!(envelope(1.0, &bell), 0.8);
        assert_eq!(envelope(2.0, &bell), 0.8);
    }

    #[test]
    fn midpoints_are_arithmetic_means() {
        for pair in SHAPE.windows(2) {
            let mid = (pair[0].time + pair[1].time) * 0.5;
            let expected = (pair[0].volume + pair[1].volume) * 0.5;
            let actual = envelope(mid, &SHAPE);
            assert!(
                (actual - expected).abs() < 1e-5,
                "midpoint {mid}: expected {expected}, got {actual}"
            );
        }
    }

    #[test]
    fn interior_points_are_hit_exactly() {
        for point in &SHAPE {
            assert!((envelope(point.time, &SHAPE) - point.volume).abs() < 1e-6);
        }
    }

    #[test]
    fn fixed_size_helpers_agree() {
        let t = 0.03;
        let five = envelope_5pt(
            t,
            (0.0, 0.0),
            (0.01, 1.0),
            (0.02, 1.0),
            (0.04, 0.2),
            (0.215, 0.0),
        );
        assert_eq!(five, envelope(t, &SHAPE));

        assert!((envelope_2pt(0.05, (0.0, 0.0), (0.1, 1.0)) - 0.5).abs() < 1e-6);
        assert!((envelope_3pt(0.5015, (0.0, 0.0), (0.003, 1.0), (1.0, 0.0)) - 0.5).abs() < 1e-3);
        assert!(
            (envelope_4pt(0.1, (0.0, 0.0), (0.05, 1.0), (0.2, 1.0), (0.25, 0.0)) - 1.0).abs()
                < 1e-6
        );
    }

    #[test]
    fn vertical_step_does_not_divide_by_zero() {
        let step = [
            EnvelopePoint::new(0.0, 1.0),
            EnvelopePoint::new(0.0, 0.0),
            EnvelopePoint::new(1.0, 0.0),
        ];
        for &t in &[0.0f32, 0.0001, 0.5, 1.0] {
            assert!(envelope(t, &step).is_finite());
        }
        assert_eq!(envelope(0.5, &[]), 0.0);
    }

    #[test]
    fn bias_keeps_end_points() {
        for amount in [0.1f32, 0.5, 0.9] {
            assert!(bias(0.0, amount).abs() < 1e-6);
            assert!((bias(1.0, amount) - 1.0).abs() < 1e-6);
        }
        assert!((bias(0.3, 0.5) - 0.3).abs() < 1e-6);
        assert!(bias(0.3, 0.9) > 0.3);
        assert!(bias(0.3, 0.1) < 0.3);
    }
}
