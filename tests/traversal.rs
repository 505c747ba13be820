//! Cursor traversal over `L1 = (a b (c (d) e) f)`

#[path = "common/mod.rs"]
mod common;

use common::scenario;
use slip::{Reader, Sequencer, SlipError, Traversal};
use test_case::test_case;

#[test]
fn advance_ser_walks_into_nested_lists() {
    let s = scenario();
    let mut reader = Reader::new(&s.slip, s.l1).unwrap();
    let seen = s.walk(&mut reader, 7, |r, slip| {
        r.advance_ser(slip).unwrap();
    });
    assert_eq!(seen, ["a@0", "b@0", "c@1", "d@2", "e@1", "f@0", "L1@0"]);
}

#[test]
fn advance_snr_stops_only_at_sublists() {
    let s = scenario();
    let mut reader = Reader::new(&s.slip, s.l1).unwrap();
    let seen = s.walk(&mut reader, 3, |r, slip| {
        r.advance_snr(slip).unwrap();
    });
    assert_eq!(seen, ["N(L2)@0", "N(L3)@1", "L1@0"]);
}

#[test]
fn advance_lwl_never_enters_sublists() {
    let s = scenario();
    let mut reader = Reader::new(&s.slip, s.l1).unwrap();
    let seen = s.walk(&mut reader, 5, |r, slip| {
        r.advance_lwl(slip).unwrap();
    });
    assert_eq!(seen, ["f@0", "N(L2)@0", "b@0", "a@0", "L1@0"]);
}

#[test_case(Traversal::LEL, &["f@0", "b@0", "a@0", "L1@0"] ; "lel")]
#[test_case(Traversal::LER, &["a@0", "b@0", "f@0", "L1@0"] ; "ler")]
#[test_case(Traversal::LNL, &["N(L2)@0", "L1@0"] ; "lnl")]
#[test_case(Traversal::LNR, &["N(L2)@0", "L1@0"] ; "lnr")]
#[test_case(Traversal::LWL, &["f@0", "N(L2)@0", "b@0", "a@0", "L1@0"] ; "lwl")]
#[test_case(Traversal::LWR, &["a@0", "b@0", "N(L2)@0", "f@0", "L1@0"] ; "lwr")]
#[test_case(Traversal::SEL, &["f@0", "e@1", "d@2", "c@1", "b@0", "a@0", "L1@0"] ; "sel")]
#[test_case(Traversal::SER, &["a@0", "b@0", "c@1", "d@2", "e@1", "f@0", "L1@0"] ; "ser")]
#[test_case(Traversal::SNL, &["N(L2)@0", "N(L3)@1", "L1@0"] ; "snl")]
#[test_case(Traversal::SNR, &["N(L2)@0", "N(L3)@1", "L1@0"] ; "snr")]
#[test_case(
    Traversal::SWL,
    &["f@0", "N(L2)@0", "e@1", "N(L3)@1", "d@2", "c@1", "b@0", "a@0", "L1@0"] ;
    "swl"
)]
#[test_case(
    Traversal::SWR,
    &["a@0", "b@0", "N(L2)@0", "c@1", "N(L3)@1", "d@2", "e@1", "f@0", "L1@0"] ;
    "swr"
)]
fn every_variant_returns_to_the_top_header(traversal: Traversal, expected: &[&str]) {
    let s = scenario();
    let mut reader = Reader::new(&s.slip, s.l1).unwrap();
    let seen = s.walk(&mut reader, expected.len(), |r, slip| {
        r.advance(slip, traversal).unwrap();
    });
    assert_eq!(seen, expected);

    // A second lap repeats the first
    let again = s.walk(&mut reader, expected.len(), |r, slip| {
        r.advance(slip, traversal).unwrap();
    });
    assert_eq!(again, expected);
}

#[test]
fn named_forwarders_match_generic_advance() {
    let s = scenario();
    for traversal in Traversal::all() {
        let mut generic = Reader::new(&s.slip, s.l1).unwrap();
        let mut named = generic.clone();
        for _ in 0..4 {
            generic.advance(&s.slip, traversal).unwrap();
            let stepped = match traversal.to_string().as_str() {
                "lel" => named.advance_lel(&s.slip),
                "ler" => named.advance_ler(&s.slip),
                "lnl" => named.advance_lnl(&s.slip),
                "lnr" => named.advance_lnr(&s.slip),
                "lwl" => named.advance_lwl(&s.slip),
                "lwr" => named.advance_lwr(&s.slip),
                "sel" => named.advance_sel(&s.slip),
                "ser" => named.advance_ser(&s.slip),
                "snl" => named.advance_snl(&s.slip),
                "snr" => named.advance_snr(&s.slip),
                "swl" => named.advance_swl(&s.slip),
                "swr" => named.advance_swr(&s.slip),
                other => panic!("unexpected code {}", other),
            };
            stepped.unwrap();
            assert_eq!(generic, named, "{} diverged", traversal);
            assert_eq!(generic.list_depth(), named.list_depth());
        }
    }
}

#[test]
fn mixing_variants_resumes_from_the_current_frame() {
    let s = scenario();
    let mut reader = Reader::new(&s.slip, s.l1).unwrap();
    reader.advance_snr(&s.slip).unwrap().advance_ser(&s.slip).unwrap();
    assert_eq!(s.label(&reader), "c@1");

    // Linear steps stay inside L2
    reader.advance_lwr(&s.slip).unwrap();
    assert_eq!(s.label(&reader), "N(L3)@1");
    reader.advance_ler(&s.slip).unwrap();
    assert_eq!(s.label(&reader), "e@1");
    reader.advance_ler(&s.slip).unwrap();
    assert_eq!(s.label(&reader), "L2@1");

    // From a nested Header a structured step starts the list over
    reader.advance_ser(&s.slip).unwrap();
    assert_eq!(s.label(&reader), "c@1");

    reader.up_level().advance_ser(&s.slip).unwrap();
    assert_eq!(s.label(&reader), "f@0");
}

#[test]
fn reset_top_restores_the_start_position() {
    let s = scenario();
    let mut reader = Reader::new(&s.slip, s.l1).unwrap();
    for _ in 0..4 {
        reader.advance_ser(&s.slip).unwrap();
    }
    assert_eq!(reader.frames().map(|f| f.depth()).collect::<Vec<_>>(), [2, 1, 0]);
    assert_eq!(
        reader.frames().map(|f| f.current_list()).collect::<Vec<_>>(),
        [s.l3, s.l2, s.l1]
    );

    reader.reset_top();
    assert_eq!(reader.list_depth(), 0);
    assert_eq!(reader.current_cell(), reader.current_list());
    assert_eq!(reader.frames().count(), 1);

    reader.reset_top();
    assert_eq!(reader.current_cell(), s.l1);
}

#[test]
fn up_level_at_the_top_is_a_no_op() {
    let s = scenario();
    let mut reader = Reader::new(&s.slip, s.l1).unwrap();
    reader.advance_ler(&s.slip).unwrap();
    let before = reader.clone();
    reader.up_level();
    assert_eq!(reader, before);
}

#[test]
fn reset_keeps_the_frame() {
    let s = scenario();
    let mut reader = Reader::new(&s.slip, s.l1).unwrap();
    reader.advance_ser(&s.slip).unwrap().advance_ser(&s.slip).unwrap().advance_ser(&s.slip).unwrap();
    reader.reset();
    assert_eq!(s.label(&reader), "L2@1");
}

#[test]
fn cursors_are_independent() {
    let s = scenario();
    let mut first = Reader::new(&s.slip, s.l1).unwrap();
    let mut second = Reader::new(&s.slip, s.l1).unwrap();
    first.advance_swr(&s.slip).unwrap();
    second.advance_swl(&s.slip).unwrap();
    first.advance_swr(&s.slip).unwrap();
    assert_eq!(s.label(&first), "b@0");
    assert_eq!(s.label(&second), "f@0");
}

#[test]
fn reader_over_a_sublist_starts_in_that_list() {
    let s = scenario();
    let sub = s.slip.cells(s.l1).unwrap()[2];
    let mut reader = Reader::new(&s.slip, sub).unwrap();
    assert_eq!(reader.current_list(), s.l2);
    let seen = s.walk(&mut reader, 4, |r, slip| {
        r.advance_ser(slip).unwrap();
    });
    assert_eq!(seen, ["c@0", "d@1", "e@0", "L2@0"]);
}

#[test]
fn released_target_is_reported_as_stale() {
    let mut s = scenario();
    let mut reader = Reader::new(&s.slip, s.l1).unwrap();
    reader.advance_ler(&s.slip).unwrap();
    let a = reader.current_cell();
    s.slip.delete_cell(a).unwrap();

    let err = reader.advance_ler(&s.slip).unwrap_err();
    assert!(matches!(err, SlipError::StaleCell { op: "advance_ler", .. }));
    assert_eq!(err.cells(), vec![a]);
    assert!(err.site().is_some());
}

#[test]
fn released_target_stays_stale_after_its_slot_is_reused() {
    let mut s = scenario();
    let mut reader = Reader::new(&s.slip, s.l1).unwrap();
    reader.advance_ler(&s.slip).unwrap();
    let a = reader.current_cell();
    s.slip.delete_cell(a).unwrap();

    // Unrelated allocation takes the freed slot
    let fresh = s.slip.push(s.l2, 99i64).unwrap();
    assert_eq!(fresh.index(), a.index());
    assert_ne!(fresh, a);

    let err = reader.advance_ler(&s.slip).unwrap_err();
    assert!(matches!(err, SlipError::StaleCell { op: "advance_ler", .. }));
    assert_eq!(err.cells(), vec![a]);
}

#[test]
fn sequencer_matches_linear_reader() {
    let s = scenario();
    let mut reader = Reader::new(&s.slip, s.l1).unwrap();
    let mut seq = Sequencer::new(&s.slip, s.l1).unwrap();
    for _ in 0..5 {
        reader.advance_lwr(&s.slip).unwrap();
        seq.advance_lwr(&s.slip).unwrap();
        assert_eq!(reader.current_cell(), seq.current_cell());
    }
    assert!(seq.is_header());
}
