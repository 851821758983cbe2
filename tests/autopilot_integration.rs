//! Headless autopilot runs: fitness reporting, distance cap and brain plumbing.

use std::sync::{Arc, Mutex};

use flapengine::autopilot::{Brain, BrainInputs, GapSeeker, evaluate};
use flapengine::resources::gameconfig::GameConfig;
use flapengine::resources::gamestate::GameStates;
use flapengine::resources::sprites::Sprites;
use flapengine::session::Session;

fn capped_config(max_distance: u64) -> GameConfig {
    let mut config = GameConfig::new();
    config.autopilot.max_distance = max_distance;
    config
}

fn seeker(config: &GameConfig) -> Box<dyn Brain> {
    Box::new(GapSeeker::new(config.autopilot.flap_threshold))
}

fn never_flap() -> Box<dyn Brain> {
    Box::new(|_: &BrainInputs| false)
}

fn always_flap() -> Box<dyn Brain> {
    Box::new(|_: &BrainInputs| true)
}

#[test]
fn test_seekers_survive_until_cap() {
    let config = capped_config(50);
    let brains = (0..3).map(|_| seeker(&config)).collect();
    let report = evaluate(&config, &Sprites::placeholder(), 7, brains).unwrap();
    assert_eq!(report.distance, 50);
    assert_eq!(report.fitness, vec![50, 50, 50]);
    assert_eq!(report.survivors, 3);
}

#[test]
fn test_fitness_follows_brain_order() {
    let config = capped_config(60);
    let brains = vec![never_flap(), seeker(&config), never_flap()];
    let report = evaluate(&config, &Sprites::placeholder(), 9, brains).unwrap();
    assert_eq!(report.fitness.len(), 3);
    assert_eq!(report.fitness[1], 60);
    assert!(report.fitness[0] < 60 && report.fitness[0] > 0);
    assert!(report.fitness[2] < 60 && report.fitness[2] > 0);
    assert_eq!(report.survivors, 1);
}

#[test]
fn test_run_stops_when_every_bird_crashed() {
    let config = capped_config(5000);
    let brains = vec![never_flap(), always_flap()];
    let report = evaluate(&config, &Sprites::placeholder(), 4, brains).unwrap();
    assert_eq!(report.survivors, 0);
    assert!(report.distance < 5000);
    // the ceiling is not fatal, so the climber lasts until the first pipe
    assert!(report.fitness[1] > report.fitness[0]);
    assert!(report.fitness.iter().all(|d| *d <= report.distance));
}

#[test]
fn test_same_seed_same_report() {
    let config = capped_config(400);
    let run = || {
        let brains = (0..4).map(|_| seeker(&config)).collect();
        evaluate(&config, &Sprites::placeholder(), 1234, brains).unwrap()
    };
    assert_eq!(run(), run());
}

#[test]
fn test_report_serializes_to_json() {
    let config = capped_config(10);
    let report = evaluate(&config, &Sprites::placeholder(), 2, vec![seeker(&config)]).unwrap();
    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["seed"], 2);
    assert_eq!(json["distance"], 10);
    assert_eq!(json["fitness"], serde_json::json!([10]));
}

#[test]
fn test_brain_sees_normalized_inputs() {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let log = Arc::clone(&seen);
    let recorder = move |inputs: &BrainInputs| {
        if let Ok(mut v) = log.lock() {
            v.push(*inputs);
        }
        inputs.vertical > 0.55
    };

    let brain: Box<dyn Brain> = Box::new(recorder);
    let mut session =
        Session::with_pilots(GameConfig::new(), Sprites::placeholder(), 3, vec![brain]).unwrap();
    assert_eq!(session.phase(), GameStates::Active);
    for _ in 0..30 {
        session.advance_active_tick(false, false);
    }

    let seen = seen.lock().unwrap();
    assert_eq!(seen.len(), 30);
    for inputs in seen.iter() {
        assert!(inputs.horizontal > 0.0);
        assert!((0.0..=1.0).contains(&inputs.vertical));
    }
    // the next pipe closes in every tick
    assert!(seen[29].horizontal < seen[0].horizontal);
}

#[test]
fn test_attach_pilot_mid_flight() {
    let config = GameConfig::new();
    let mut session =
        Session::with_pilots(config.clone(), Sprites::placeholder(), 5, vec![seeker(&config)])
            .unwrap();
    session.advance_active_tick(false, false);
    let late = session.attach_pilot(seeker(&config));
    assert_eq!(session.bird_entities().len(), 2);
    assert_eq!(session.bird(late).map(|b| b.rotation), Some(30.0));
    assert_eq!(session.flying_count(), 2);
    assert_eq!(session.pilot_fitness(), vec![1, 1]);
}
