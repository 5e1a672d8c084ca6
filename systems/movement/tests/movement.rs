use glam::{Vec2, Vec3};
use ray_arena_core::{Command, GridMap, PITCH_LIMIT};
use ray_arena_system_movement::{look, Movement, MovementInput};
use ray_arena_world::{self as world, query, World};

#[test]
fn pitch_stays_bounded_for_arbitrary_mouse_travel() {
    let deltas = [
        Vec2::new(0.0, -10_000.0),
        Vec2::new(3.0, 500.0),
        Vec2::new(-40.0, 279.9),
        Vec2::new(0.0, 1.0e9),
        Vec2::new(12.0, -0.5),
        Vec2::new(0.0, -1.0e9),
        Vec2::new(-7.0, 0.01),
    ];

    let mut pose = query::player(&World::new(GridMap::new(3, 3)));
    for delta in deltas {
        pose = look(pose, delta, 0.005);
        assert!(
            (-PITCH_LIMIT..=PITCH_LIMIT).contains(&pose.pitch),
            "pitch {} escaped after delta {delta}",
            pose.pitch
        );
    }
}

#[test]
fn stepped_pose_is_accepted_by_world() {
    let mut world = World::new(GridMap::new(10, 10));
    let movement = Movement::default();
    let input = MovementInput {
        forward: true,
        look_delta: Vec2::new(0.0, -50.0),
        ..MovementInput::default()
    };

    let mut events = Vec::new();
    for _ in 0..30 {
        let pose = movement.step(query::player(&world), &input, 1.0 / 30.0);
        world::apply(&mut world, Command::PlacePlayer { pose }, &mut events);
    }

    let player = query::player(&world);
    assert!(player.position.z > 5.5);
    assert_eq!(player.position.y, 0.0);
    assert!(player.pitch <= PITCH_LIMIT);
    assert_eq!(events.len(), 30);
}

#[test]
fn jump_arc_returns_to_the_floor() {
    let movement = Movement::default();
    let mut pose = query::player(&World::new(GridMap::new(3, 3)));
    let start = pose.position;

    let jump = MovementInput {
        jump_pressed: true,
        ..MovementInput::default()
    };
    pose = movement.step(pose, &jump, 0.01);

    let mut peak = pose.position.y;
    for _ in 0..200 {
        pose = movement.step(pose, &MovementInput::default(), 0.01);
        peak = peak.max(pose.position.y);
        assert!(pose.position.y >= 0.0);
    }

    assert!(peak > 1.0 && peak < 1.5, "peak height was {peak}");
    assert_eq!(pose.position, Vec3::new(start.x, 0.0, start.z));
    assert_eq!(pose.velocity.y, 0.0);
}
