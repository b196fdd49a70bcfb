//! Scenario tests - full message flows through the wire protocol and core.

use match_viz::{
    Canvas, EdgeClass, HistoryWire, Inbound, MatchingDelta, Phase, Side, VizEngine,
};
use serde_json::json;

fn canvas() -> Canvas {
    Canvas {
        width: 1280.0,
        height: 720.0,
    }
}

fn viz_with(messages: Vec<Inbound>) -> VizEngine {
    let mut viz = VizEngine::new(canvas());
    for msg in messages {
        viz.apply(msg);
    }
    viz
}

fn delta(husband_id: u32, wife_id: u32, unmarried_id: u32) -> MatchingDelta {
    MatchingDelta {
        husband_id,
        wife_id,
        unmarried_id,
    }
}

/// One man `{ID: 0, Preferences: [1, 0]}` and two women: after the people
/// update he has two preference edges of differing weight, and the delta
/// `{0, 1, 0}` pairs him with woman 1.
#[test]
fn test_one_man_two_women_scenario() {
    let people = Inbound::parse(
        "update-people",
        &json!({
            "Men": [{"ID": 0, "Preferences": [1, 0]}],
            "Women": [
                {"ID": 0, "Preferences": [0]},
                {"ID": 1, "Preferences": [0]},
            ],
        }),
    )
    .unwrap();
    let mut viz = viz_with(vec![people]);

    let frame = viz.render_pass();
    let man_pos = viz.registry().get(Side::Man, 0).unwrap().pos;
    let prefs: Vec<_> = frame
        .edges_of(EdgeClass::Preference)
        .filter(|e| e.from == man_pos)
        .collect();
    assert_eq!(prefs.len(), 2);
    assert_ne!(prefs[0].weight, prefs[1].weight);

    let matching = Inbound::parse(
        "update-matching",
        &json!({"HusbandID": 0, "WifeID": 1, "UnmarriedID": 0}),
    )
    .unwrap();
    viz.apply(matching);

    assert_eq!(viz.registry().get(Side::Man, 0).unwrap().partner, Some(1));

    let frame = viz.render_pass();
    let woman1_pos = viz.registry().get(Side::Woman, 1).unwrap().pos;
    let matches: Vec<_> = frame.edges_of(EdgeClass::Matching).collect();
    assert_eq!(matches.len(), 1);
    assert_eq!(matches[0].to, woman1_pos);
}

/// A 3-step log: throttled cadence while stepping, normal cadence and `Idle`
/// once the third advance has happened and the machine settles.
#[test]
fn test_three_step_cadence_scenario() {
    let mut viz = viz_with(vec![Inbound::People(population(3))]);
    viz.apply(Inbound::History(HistoryWire {
        steps: vec![delta(0, 0, 0), delta(1, 1, 1), delta(2, 2, 2)],
    }));

    let throttled = viz.cadence().throttled;
    let normal = viz.cadence().normal;

    assert_eq!(viz.playback().phase(), Phase::Stepping);
    assert_eq!(viz.pass_interval(), throttled);

    viz.render_pass();
    assert_eq!(viz.pass_interval(), throttled);
    viz.render_pass();
    assert_eq!(viz.pass_interval(), throttled);

    // Third advance: the run is done, cadence reverts, the machine settles
    viz.render_pass();
    assert_eq!(viz.pass_interval(), normal);
    viz.render_pass();
    assert_eq!(viz.playback().phase(), Phase::Idle);

    // The final frozen picture keeps all three history edges
    let frame = viz.render_pass();
    assert_eq!(frame.edges_of(EdgeClass::History).count(), 3);
}

#[test]
fn test_delta_guard_preserves_recent_assignment() {
    let mut viz = viz_with(vec![Inbound::People(population(2))]);

    viz.apply(Inbound::Matching(delta(0, 1, 0)));
    assert_eq!(viz.registry().get(Side::Man, 0).unwrap().partner, Some(1));

    viz.apply(Inbound::Matching(delta(1, 1, 0)));
    assert_eq!(viz.registry().get(Side::Man, 1).unwrap().partner, Some(1));
    assert_eq!(viz.registry().get(Side::Man, 0).unwrap().partner, None);
}

#[test]
fn test_snapshot_mid_playback_cancels_and_clears() {
    let mut viz = viz_with(vec![Inbound::People(population(2))]);
    viz.apply(Inbound::History(HistoryWire {
        steps: vec![delta(0, 0, 0), delta(1, 1, 1)],
    }));
    viz.render_pass();
    assert_eq!(viz.render_pass().edges_of(EdgeClass::History).count(), 2);

    viz.apply(Inbound::People(population(2)));

    assert_eq!(viz.playback().phase(), Phase::Idle);
    let frame = viz.render_pass();
    assert_eq!(frame.edges_of(EdgeClass::History).count(), 0);
    // Markers always draw
    assert_eq!(frame.markers.len(), 4);
}

#[test]
fn test_malformed_message_drops_whole() {
    let err = Inbound::parse("update-matching", &json!({"HusbandID": 1})).unwrap_err();
    assert!(err.to_string().contains("update-matching"));

    // An unparseable message never reaches the core; prior state holds
    let mut viz = viz_with(vec![Inbound::People(population(2))]);
    let before = viz.state_hash();
    assert!(Inbound::parse("update-people", &json!({"Men": 3})).is_err());
    assert_eq!(viz.state_hash(), before);
}

#[test]
fn test_zero_population() {
    let mut viz = viz_with(vec![Inbound::People(population(0))]);

    let frame = viz.render_pass();
    assert!(frame.markers.is_empty());
    assert!(frame.edges.is_empty());

    // History against an empty registry stays disarmed
    viz.apply(Inbound::History(HistoryWire {
        steps: vec![delta(0, 0, 0)],
    }));
    assert_eq!(viz.playback().phase(), Phase::Idle);
}

#[test]
fn test_corrupt_history_step_is_skipped() {
    let mut viz = viz_with(vec![Inbound::People(population(2))]);
    viz.apply(Inbound::History(HistoryWire {
        steps: vec![delta(7, 0, 7), delta(0, 0, 0)],
    }));

    while viz.playback().phase() != Phase::Idle {
        viz.render_pass();
    }

    // Only the well-formed step left an edge
    assert_eq!(viz.playback().edges().len(), 1);
    assert!(viz.playback().edges().contains_key(&0));
}

fn population(n: u32) -> match_viz::PopulationWire {
    let side = || {
        (0..n)
            .map(|id| match_viz::PersonWire {
                id,
                preferences: (0..n).collect(),
            })
            .collect()
    };
    match_viz::PopulationWire {
        men: side(),
        women: side(),
    }
}
