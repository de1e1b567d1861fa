//! Unit tests for uni-core primitives.

#[cfg(test)]
mod ids {
    use crate::{AgentId, CellId};

    #[test]
    fn index_roundtrip() {
        let id = AgentId(42);
        assert_eq!(id.index(), 42);
        assert_eq!(AgentId::try_from(42usize).unwrap(), id);
    }

    #[test]
    fn invalid_sentinels_are_max() {
        assert_eq!(AgentId::INVALID.0, u32::MAX);
        assert_eq!(CellId::INVALID.0, u32::MAX);
        assert!(!AgentId::default().is_valid());
        assert!(AgentId(0).is_valid());
    }

    #[test]
    fn display() {
        assert_eq!(AgentId(7).to_string(), "AgentId(7)");
    }
}

#[cfg(test)]
mod geom {
    use std::f64::consts::PI;

    use proptest::prelude::*;

    use crate::{Pose, Torus, wrap_angle};

    #[test]
    fn wrap_distance_examples() {
        let t = Torus::new(1.0);
        assert_eq!(t.wrap_distance(0.25), 0.25);
        assert!((t.wrap_distance(1.25) - 0.25).abs() < 1e-12);
        assert!((t.wrap_distance(-0.25) - 0.75).abs() < 1e-12);
        assert_eq!(t.wrap_distance(1.0), 0.0);
        assert_eq!(t.wrap_distance(0.0), 0.0);
    }

    #[test]
    fn wrap_distance_tiny_negative_stays_below_size() {
        let t = Torus::new(1.0);
        let w = t.wrap_distance(-1e-18);
        assert!((0.0..1.0).contains(&w), "got {w}");
    }

    #[test]
    fn wrap_angle_examples() {
        assert_eq!(wrap_angle(PI), PI);
        assert!((wrap_angle(-PI) - PI).abs() < 1e-12, "-π maps to +π");
        assert!((wrap_angle(3.0 * PI / 2.0) + PI / 2.0).abs() < 1e-12);
        assert!((wrap_angle(-5.0 * PI / 2.0) + PI / 2.0).abs() < 1e-12);
        assert_eq!(wrap_angle(0.5), 0.5);
    }

    #[test]
    fn delta_takes_short_way_round() {
        let t = Torus::new(1.0);
        assert!((t.delta(0.05, 0.95) + 0.1).abs() < 1e-12);
        assert!((t.delta(0.95, 0.05) - 0.1).abs() < 1e-12);
        assert!((t.delta(0.2, 0.4) - 0.2).abs() < 1e-12);
    }

    #[test]
    fn pose_display_matches_termination_format() {
        let p = Pose::new(0.5, 0.25, -1.0);
        assert_eq!(p.to_string(), "x 0.500000 y 0.250000 a -1.000000");
    }

    proptest! {
        #[test]
        fn wrap_distance_in_range(d in -1.0e6f64..1.0e6, size in 0.01f64..100.0) {
            let t = Torus::new(size);
            let w = t.wrap_distance(d);
            prop_assert!(w >= 0.0 && w < size, "wrap_distance({d}) = {w} for size {size}");
        }

        #[test]
        fn wrap_distance_idempotent(d in -1.0e6f64..1.0e6, size in 0.01f64..100.0) {
            let t = Torus::new(size);
            let w = t.wrap_distance(d);
            prop_assert_eq!(t.wrap_distance(w), w);
        }

        #[test]
        fn wrap_angle_in_range(a in -1.0e4f64..1.0e4) {
            let w = wrap_angle(a);
            prop_assert!(w > -PI && w <= PI, "wrap_angle({a}) = {w}");
        }

        #[test]
        fn wrap_angle_idempotent(a in -1.0e4f64..1.0e4) {
            let w = wrap_angle(a);
            prop_assert_eq!(wrap_angle(w), w);
        }

        #[test]
        fn wrap_angle_preserves_direction(a in -1.0e3f64..1.0e3) {
            let w = wrap_angle(a);
            prop_assert!((w.cos() - a.cos()).abs() < 1e-6);
            prop_assert!((w.sin() - a.sin()).abs() < 1e-6);
        }
    }
}

#[cfg(test)]
mod time {
    use crate::Tick;

    #[test]
    fn tick_arithmetic() {
        assert_eq!(Tick(3).next(), Tick(4));
        assert_eq!(Tick(15) - Tick(10), 5u64);
        assert!(Tick(8).is_multiple_of(4));
        assert!(!Tick(8).is_multiple_of(0));
    }
}

#[cfg(test)]
mod config {
    use crate::UniConfig;

    #[test]
    fn defaults_validate() {
        let c = UniConfig::default();
        c.validate().unwrap();
        assert!((c.fov() - 270f64.to_radians()).abs() < 1e-12);
    }

    #[test]
    fn rejects_bad_scalars() {
        let bad = [
            UniConfig { world_size: 0.0, ..UniConfig::default() },
            UniConfig { world_size: f64::NAN, ..UniConfig::default() },
            UniConfig { range: -1.0, ..UniConfig::default() },
            UniConfig { fov_degrees: 0.0, ..UniConfig::default() },
            UniConfig { fov_degrees: 361.0, ..UniConfig::default() },
            UniConfig { pixel_count: 0, ..UniConfig::default() },
            UniConfig { workers: 0, ..UniConfig::default() },
        ];
        for c in bad {
            assert!(c.validate().is_err(), "expected rejection: {c:?}");
        }
    }

    #[test]
    fn cap_zero_is_unbounded() {
        let c = UniConfig { tick_cap: 0, ..UniConfig::default() };
        assert!(!c.cap_reached(1_000_000));
        let c = UniConfig { tick_cap: 5, ..UniConfig::default() };
        assert!(!c.cap_reached(4));
        assert!(c.cap_reached(5));
    }
}

#[cfg(test)]
mod rng {
    use std::f64::consts::PI;

    use crate::{SimRng, Torus};

    #[test]
    fn same_seed_same_poses() {
        let t = Torus::new(2.0);
        let mut a = SimRng::new(7);
        let mut b = SimRng::new(7);
        for _ in 0..32 {
            assert_eq!(a.pose(&t), b.pose(&t));
        }
    }

    #[test]
    fn poses_are_normalized() {
        let t = Torus::new(2.0);
        let mut r = SimRng::new(1);
        for _ in 0..1_000 {
            let p = r.pose(&t);
            assert!((0.0..2.0).contains(&p.x));
            assert!((0.0..2.0).contains(&p.y));
            assert!(p.a > -PI && p.a <= PI);
        }
    }
}
