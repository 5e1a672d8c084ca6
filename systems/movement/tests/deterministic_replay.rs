use glam::Vec2;
use ray_arena_core::{GridMap, PlayerPose};
use ray_arena_system_movement::{Movement, MovementInput, PlayerTuning};
use ray_arena_world::{query, World};

fn scripted_inputs() -> Vec<MovementInput> {
    (0..240)
        .map(|frame: u32| MovementInput {
            look_delta: Vec2::new((frame % 7) as f32 - 3.0, (frame % 5) as f32 - 2.0),
            forward: frame % 3 != 0,
            backward: frame % 11 == 0,
            left: frame % 4 == 1,
            right: frame % 6 == 2,
            run: frame > 120,
            jump_pressed: frame % 60 == 0,
        })
        .collect()
}

fn replay(tuning: PlayerTuning) -> Vec<PlayerPose> {
    let movement = Movement::new(tuning);
    let mut pose = query::player(&World::new(GridMap::new(20, 20)));
    scripted_inputs()
        .iter()
        .map(|input| {
            pose = movement.step(pose, input, 1.0 / 60.0);
            pose
        })
        .collect()
}

#[test]
fn identical_inputs_replay_identically() {
    let first = replay(PlayerTuning::default());
    let second = replay(PlayerTuning::default());

    assert_eq!(first, second);
}

#[test]
fn tuning_changes_the_trajectory() {
    let baseline = replay(PlayerTuning::default());
    let faster = replay(PlayerTuning {
        base_speed: 4.0,
        ..PlayerTuning::default()
    });

    assert_ne!(baseline.last(), faster.last());
}
