#![forbid(unsafe_code)]

//! Table fixtures and headline rotation through the public API.
//!
//! Run:
//!   cargo test -p pagereel-widgets --test fixtures_and_rotation

use std::time::Duration;

use pagereel_core::animation::StaggerFrom;
use pagereel_runtime::RotatorConfig;
use pagereel_widgets::{DataTable, RotatingText};
use pretty_assertions::assert_eq;
use proptest::prelude::*;

#[test]
fn two_by_two_fixture_renders_positionally() {
    let table = DataTable::from_reader(
        r#"{"columns": ["a", "b"], "data": [["1", "2"], ["3", "4"]]}"#.as_bytes(),
    )
    .unwrap();
    let view = table.view();
    assert_eq!(view.header, vec!["a".to_string(), "b".to_string()]);
    assert_eq!(
        view.rows,
        vec![
            vec!["1".to_string(), "2".to_string()],
            vec!["3".to_string(), "4".to_string()],
        ]
    );
    assert!(table.row_mismatches().is_empty());
    assert_eq!(table.render_text(), "a | b\n- | -\n1 | 2\n3 | 4\n");
}

#[test]
fn default_headline_cycles_page_phrases() {
    let mut rotator = RotatingText::from_config(&RotatorConfig::default()).unwrap();
    assert_eq!(rotator.interval(), Duration::from_millis(2000));
    let phrases: Vec<String> = (0..3)
        .map(|_| {
            let current = rotator.current().to_string();
            rotator.tick();
            current
        })
        .collect();
    assert_eq!(phrases, ["多彩", "智能", "AI应用生态"]);
    assert_eq!(rotator.current(), "多彩");
}

#[test]
fn empty_config_is_rejected() {
    let config = RotatorConfig {
        texts: Vec::new(),
        ..RotatorConfig::default()
    };
    assert!(RotatingText::from_config(&config).is_err());
}

proptest! {
    #[test]
    fn single_phrase_never_changes(ticks in 0usize..100) {
        let mut rotator = RotatingText::new(["solo"], Duration::from_millis(10)).unwrap();
        for _ in 0..ticks {
            prop_assert!(rotator.tick().is_none());
            prop_assert_eq!(rotator.current(), "solo");
        }
    }

    #[test]
    fn delay_increases_away_from_origin(phrase in "[a-z]{2,12}", last in any::<bool>()) {
        let from = if last { StaggerFrom::Last } else { StaggerFrom::First };
        let mut rotator = RotatingText::new(["x", phrase.as_str()], Duration::from_secs(1))
            .unwrap()
            .stagger(Duration::from_millis(25))
            .stagger_from(from);
        let enter = rotator.tick().unwrap().enter;
        let delays: Vec<Duration> = enter.iter().map(|g| g.delay).collect();
        if last {
            prop_assert_eq!(*delays.last().unwrap(), Duration::ZERO);
            prop_assert!(delays.windows(2).all(|w| w[0] > w[1]));
        } else {
            prop_assert_eq!(delays[0], Duration::ZERO);
            prop_assert!(delays.windows(2).all(|w| w[0] < w[1]));
        }
    }
}
