use bevy_ecs::prelude::*;

use crate::autopilot::SensorRanges;
use crate::components::bird::Bird;
use crate::components::crashed::Crashed;
use crate::components::pilot::Pilot;
use crate::resources::pipes::PipeStream;

/// Feed each piloted bird its sensor readings and latch a flap when its
/// brain asks for one. Runs before the physics step.
pub fn pilot_system(
    ranges: Res<SensorRanges>,
    pipes: Res<PipeStream>,
    mut birds: Query<(&mut Bird, &mut Pilot), Without<Crashed>>,
) {
    let half_gap = pipes.gap() / 2;
    for (mut bird, mut pilot) in birds.iter_mut() {
        let Some(next) = pipes.next_ahead_of(bird.x) else {
            continue;
        };
        let err_x = next.right() - bird.x;
        let err_y = bird.y - (next.lower_y - half_gap);
        let inputs = ranges.inputs(err_x, err_y);
        if pilot.brain.decide(&inputs) {
            bird.flap();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::autopilot::{Brain, BrainInputs};
    use crate::resources::gameconfig::GameConfig;
    use crate::resources::sprites::Sprites;
    use std::sync::{Arc, Mutex};

    struct Recorder(Arc<Mutex<Vec<BrainInputs>>>);

    impl Brain for Recorder {
        fn decide(&mut self, inputs: &BrainInputs) -> bool {
            if let Ok(mut seen) = self.0.lock() {
                seen.push(*inputs);
            }
            true
        }
    }

    #[test]
    fn test_pilot_reads_next_pipe_and_flaps() {
        let config = GameConfig::new();
        let sprites = Sprites::placeholder();
        let mut world = World::new();
        world.insert_resource(SensorRanges::from_config(&config, &sprites).unwrap());

        let mut pipes = PipeStream::new(
            &config.course,
            config.ground_y(),
            388,
            Arc::clone(&sprites.pipes),
            fastrand::Rng::with_seed(1),
        )
        .unwrap();
        // first pair already behind the bird, second one ahead
        let behind = pipes.spawn_with_gap_top(0, 150);
        let ahead = pipes.spawn_with_gap_top(152, 150);
        pipes.push(behind);
        pipes.push(ahead);
        world.insert_resource(pipes);

        let seen = Arc::new(Mutex::new(Vec::new()));
        let bird = Bird::new(57, 200, 404, Arc::clone(&sprites.bird), config.bird);
        let entity = world
            .spawn((bird, Pilot::new(0, Box::new(Recorder(Arc::clone(&seen))))))
            .id();

        let mut schedule = Schedule::default();
        schedule.add_systems(pilot_system);
        schedule.run(&mut world);

        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        // err_x = 152 + 52 - 57, err_y = 200 - (250 - 50)
        assert!((seen[0].horizontal - 147.0 / 152.0).abs() < 1e-6);
        assert!((seen[0].vertical - 297.0 / 547.0).abs() < 1e-6);
        assert!(world.get::<Bird>(entity).unwrap().has_flapped());
    }
}
