//! Property-based tests for the reply format.
//!
//! These tests generate replies across the whole representable range and
//! check that parsing reproduces what was encoded, and that no input at all
//! can make the parser panic.

mod common;

use checkout_scale_core::WeightStatus;
use checkout_scale_protocol::{FrameAccumulator, FrameBuilder, FrameParser, ParseOutcome};
use proptest::prelude::*;

/// Every weight the default `NN.NNN` field can carry, in thousandths.
fn representable_thousandths() -> impl Strategy<Value = u32> {
    0u32..=99_999u32
}

/// Unit strings that fit the two-column unit field.
fn valid_units() -> impl Strategy<Value = String> {
    prop::string::string_regex("[A-Za-z]{1,2}").expect("Failed to create units regex strategy")
}

fn any_status() -> impl Strategy<Value = WeightStatus> {
    prop_oneof![
        Just(WeightStatus::Ok),
        Just(WeightStatus::Zero),
        Just(WeightStatus::Motion),
        Just(WeightStatus::UnderCapacity),
        Just(WeightStatus::OverCapacity),
        Just(WeightStatus::Fault),
    ]
}

proptest! {
    /// Property: an OK reply for any representable weight parses back to
    /// exactly the same (status, total, units) triple.
    #[test]
    fn prop_stable_reading_roundtrip(
        thousandths in representable_thousandths(),
        units in valid_units(),
    ) {
        let total = f64::from(thousandths) / 1000.0;
        let frame = FrameBuilder::default()
            .weight_reply(WeightStatus::Ok, total, &units)
            .unwrap();

        let outcome = FrameParser::default().parse(&frame).unwrap();
        let reading = outcome.into_reading().unwrap();

        prop_assert_eq!(reading.status, WeightStatus::Ok);
        prop_assert_eq!(reading.total, total);
        prop_assert_eq!(reading.units, units);
    }

    /// Property: the status survives encoding for every status.
    #[test]
    fn prop_status_roundtrip(status in any_status()) {
        let frame = FrameBuilder::default().status_reply(status);
        prop_assert_eq!(FrameParser::default().parse_status(&frame).unwrap(), status);
    }

    /// Property: non-OK weigh replies never produce a reading.
    #[test]
    fn prop_non_ok_never_yields_reading(status in any_status(), thousandths in representable_thousandths()) {
        prop_assume!(status != WeightStatus::Ok);
        let frame = common::reply(status, f64::from(thousandths) / 1000.0, "LB");
        match FrameParser::default().parse(&frame) {
            Ok(ParseOutcome::NoReading(reported)) => {
                prop_assert!(reported.is_transient());
                prop_assert_eq!(reported, status);
            }
            Ok(ParseOutcome::Reading(reading)) => {
                prop_assert!(false, "unexpected reading {}", reading);
            }
            Err(err) => prop_assert!(status.is_fault(), "unexpected error {}", err),
        }
    }

    /// Property: arbitrary bytes never panic the accumulator or the parser.
    #[test]
    fn prop_arbitrary_bytes_do_not_panic(bytes in prop::collection::vec(any::<u8>(), 0..512)) {
        let parser = FrameParser::default();
        let _ = parser.parse(&bytes);
        let _ = parser.parse_status(&bytes);

        let mut acc = FrameAccumulator::new();
        if let Ok(Some(frame)) = acc.feed(&bytes) {
            let _ = parser.parse(&frame);
        }
    }

    /// Property: splitting a reply at any point yields the same frame.
    #[test]
    fn prop_split_point_irrelevant(split in 0usize..common::STABLE_LB.len()) {
        let (head, tail) = common::STABLE_LB.split_at(split);
        let mut acc = FrameAccumulator::new();
        let first = acc.feed(head).unwrap();
        prop_assert!(first.is_none());
        let frame = acc.feed(tail).unwrap().unwrap();
        prop_assert_eq!(&frame[..], common::STABLE_LB);
    }
}
