// crates/bot-core/tests/admission_and_counter.rs
use std::sync::Arc;
use std::thread;

use bot_core::{
    admit, Admission, Challenge, ConcurrencyCounter, DeclineReason, Speed, TimeControl,
    TimeControlKind, Variant,
};

fn challenge(variant: &str, speed: Speed, kind: TimeControlKind) -> Challenge {
    Challenge {
        id: "ch1".to_string(),
        challenger: None,
        variant: Variant {
            key: variant.to_string(),
        },
        speed,
        time_control: TimeControl { kind },
    }
}

#[test]
fn standard_clock_game_with_room_is_accepted() {
    for speed in [Speed::Bullet, Speed::Blitz, Speed::Rapid, Speed::Classical] {
        let c = challenge("standard", speed, TimeControlKind::Clock);
        assert_eq!(admit(&c, 0, 4), Admission::Accept, "{:?}", speed);
        assert_eq!(admit(&c, 3, 4), Admission::Accept, "{:?}", speed);
    }
}

#[test]
fn non_standard_variant_is_always_declined_with_standard() {
    for speed in [Speed::Bullet, Speed::UltraBullet, Speed::Correspondence] {
        for kind in [TimeControlKind::Clock, TimeControlKind::Unlimited] {
            for active in [0, 4, 9] {
                let c = challenge("chess960", speed, kind);
                assert_eq!(
                    admit(&c, active, 4),
                    Admission::Decline(DeclineReason::Standard)
                );
            }
        }
    }
}

#[test]
fn unsupported_speed_or_time_control_is_declined_with_time_control() {
    let c = challenge("standard", Speed::UltraBullet, TimeControlKind::Clock);
    assert_eq!(admit(&c, 0, 4), Admission::Decline(DeclineReason::TimeControl));

    let c = challenge("standard", Speed::Correspondence, TimeControlKind::Correspondence);
    assert_eq!(admit(&c, 0, 4), Admission::Decline(DeclineReason::TimeControl));

    // Checked before capacity.
    let c = challenge("standard", Speed::Blitz, TimeControlKind::Unlimited);
    assert_eq!(admit(&c, 4, 4), Admission::Decline(DeclineReason::TimeControl));
}

#[test]
fn full_house_is_declined_with_later() {
    let c = challenge("standard", Speed::Blitz, TimeControlKind::Clock);
    assert_eq!(admit(&c, 4, 4), Admission::Decline(DeclineReason::Later));
}

#[test]
fn decline_reason_wire_values() {
    assert_eq!(DeclineReason::Standard.as_str(), "standard");
    assert_eq!(DeclineReason::TimeControl.as_str(), "timeControl");
    assert_eq!(DeclineReason::Later.as_str(), "later");
}

#[test]
fn counter_stays_within_bounds() {
    let counter = ConcurrencyCounter::new(2);
    assert!(counter.try_acquire());
    assert!(counter.try_acquire());
    assert!(!counter.try_acquire());
    assert_eq!(counter.current(), 2);
    assert!(!counter.has_capacity());

    assert!(counter.release());
    assert!(counter.release());
    assert!(!counter.release());
    assert_eq!(counter.current(), 0);
}

#[test]
fn counter_is_consistent_under_contention() {
    let counter = Arc::new(ConcurrencyCounter::new(8));
    let mut handles = Vec::new();

    for _ in 0..8 {
        let counter = Arc::clone(&counter);
        handles.push(thread::spawn(move || {
            let mut acquired = 0usize;
            for _ in 0..1_000 {
                if counter.try_acquire() {
                    acquired += 1;
                    assert!(counter.current() <= counter.max());
                    assert!(counter.release());
                    acquired -= 1;
                }
            }
            acquired
        }));
    }

    for handle in handles {
        assert_eq!(handle.join().unwrap(), 0);
    }
    assert_eq!(counter.current(), 0);
}
