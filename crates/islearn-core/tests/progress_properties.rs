//! Property tests for progress and session invariants.

use proptest::prelude::*;

use islearn_core::catalog::{builtin_levels, builtin_rewards};
use islearn_core::progress::evaluate_rewards;
use islearn_core::{GameSession, GameSettings, LevelCatalog, ProgressStore, Sign};

const SIGN_IDS: [&str; 6] = ["1", "2", "3", "4", "5", "unknown"];

fn store() -> ProgressStore {
    ProgressStore::new(LevelCatalog::new(builtin_levels()).unwrap(), builtin_rewards()).unwrap()
}

fn sign_ids() -> impl Strategy<Value = Vec<&'static str>> {
    prop::collection::vec(prop::sample::select(SIGN_IDS.to_vec()), 0..20)
}

proptest! {
    #[test]
    fn completing_twice_changes_nothing(ids in sign_ids(), repeat in prop::sample::select(SIGN_IDS.to_vec())) {
        let mut store = store();
        for id in &ids {
            store.complete_sign(id);
        }
        store.complete_sign(repeat);
        let once = store.profile().clone();
        let rewards_once = store.rewards().to_vec();

        store.complete_sign(repeat);
        prop_assert_eq!(&store.profile().completed_signs, &once.completed_signs);
        prop_assert_eq!(&store.profile().rewards_earned, &once.rewards_earned);
        prop_assert_eq!(store.profile().total_score, once.total_score);
        prop_assert_eq!(store.rewards(), rewards_once.as_slice());
    }

    #[test]
    fn completed_signs_stay_in_catalog(ids in sign_ids()) {
        let mut store = store();
        for id in &ids {
            store.complete_sign(id);
        }
        let profile = store.profile();
        prop_assert!(!profile.completed_signs.contains("unknown"));
        prop_assert!(profile.level_unlocked >= profile.current_level);
        prop_assert!(profile.current_level <= 2);
    }

    #[test]
    fn reward_evaluation_is_pure(ids in sign_ids()) {
        let catalog = LevelCatalog::new(builtin_levels()).unwrap();
        let completed = ids.iter().map(|s| s.to_string()).collect();
        let first = evaluate_rewards(&completed, &catalog, &builtin_rewards());
        let second = evaluate_rewards(&completed, &catalog, &builtin_rewards());
        prop_assert_eq!(first, second);
    }

    #[test]
    fn reset_is_idempotent(ids in sign_ids()) {
        let mut store = store();
        for id in &ids {
            store.complete_sign(id);
        }
        store.reset_progress();
        let once = store.profile().clone();
        store.reset_progress();
        prop_assert_eq!(store.profile(), &once);
        prop_assert_eq!(once.current_level, 1);
        prop_assert!(once.completed_signs.is_empty());
    }

    #[test]
    fn score_grows_by_at_most_one_sign_per_evaluation(results in prop::collection::vec(any::<bool>(), 0..12)) {
        let settings = GameSettings { feedback_delay_ms: 0, ..GameSettings::default() };
        let mut session = GameSession::new(settings);
        session.start_game(vec![Sign::new("a", "A"), Sign::new("b", "B"), Sign::new("c", "C")]);

        for correct in results {
            let before = session.score();
            if session.evaluate_binary(correct).unwrap().is_some() {
                let gained = session.score() - before;
                prop_assert!(gained == 0 || gained == settings.points_per_sign);
                prop_assert_eq!(gained > 0, correct);
            }
            session.tick_at(u64::MAX);
            prop_assert!(session.cursor() < 3);
        }
    }
}
