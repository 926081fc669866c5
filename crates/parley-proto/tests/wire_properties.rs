//! Property tests for frame decoding.
//!
//! Frames arrive from an untrusted network; decoding must reject garbage with
//! an error rather than panic, and roster order must survive the wire.

use parley_proto::{Inbound, Outbound, RosterUpdate};
use proptest::prelude::*;

proptest! {
    #[test]
    fn prop_decode_never_panics(text in ".{0,256}") {
        let _ = Inbound::decode(&text);
        let _ = Outbound::decode(&text);
    }

    #[test]
    fn prop_roster_order_survives_wire(members in prop::collection::vec("[a-z]{1,12}", 0..20)) {
        let frame = Inbound::Roster(RosterUpdate { members: members.clone() }).encode().unwrap();

        match Inbound::decode(&frame).unwrap() {
            Inbound::Roster(update) => prop_assert_eq!(update.members, members),
            other => prop_assert!(false, "unexpected event {:?}", other),
        }
    }
}
