use glam::Vec3;
use ray_arena_core::{Command, EnemyId, EnemyState, GridMap};
use ray_arena_system_hitscan::{Hitscan, Ray};
use ray_arena_world::{self as world, query, World};

#[test]
fn ray_sphere_test_is_translation_invariant() {
    let cases = [
        (Vec3::new(0.0, 0.9, 0.0), Vec3::new(0.2, 1.0, 3.0), true),
        (Vec3::new(0.0, 0.9, 0.0), Vec3::new(1.0, 0.0, 3.0), false),
        (Vec3::new(1.0, 0.0, 1.0), Vec3::new(1.0, 0.0, -2.0), false),
        (Vec3::new(-2.0, 0.5, 4.0), Vec3::new(-2.3, 0.2, 9.0), true),
    ];
    let offsets = [
        Vec3::new(10.0, 0.0, 0.0),
        Vec3::new(-3.5, 2.0, 7.25),
        Vec3::new(0.0, -0.9, 100.0),
    ];

    for (origin, center, expected) in cases {
        let ray = Ray {
            origin,
            direction: Vec3::Z,
        };
        assert_eq!(ray.hits_sphere(center, 0.5), expected);

        for offset in offsets {
            let moved = Ray {
                origin: origin + offset,
                direction: Vec3::Z,
            };
            assert_eq!(
                moved.hits_sphere(center + offset, 0.5),
                expected,
                "translation by {offset} changed the outcome"
            );
        }
    }
}

#[test]
fn shot_from_spawn_hits_enemy_aimed_at() {
    let rows = vec![vec![0, 0, 0], vec![0, 2, 0], vec![0, 3, 0]];
    let mut world = World::new(GridMap::from_codes(&rows).expect("valid grid"));
    let mut system = Hitscan::new();
    let mut commands = Vec::new();

    let level = Ray::from_player(&query::player(&world), 1.8);
    system.handle(&level, &query::enemy_view(&world), &mut commands);
    assert!(commands.is_empty(), "level shot passes over the enemy");

    let mut pose = query::player(&world);
    pose.pitch = -(0.9_f32).atan2(1.0);
    let ray = Ray::from_player(&pose, 1.8);
    system.handle(&ray, &query::enemy_view(&world), &mut commands);

    assert_eq!(
        commands,
        vec![Command::ResolveHits {
            enemies: vec![EnemyId::new(0)]
        }]
    );

    let mut events = Vec::new();
    for command in commands {
        world::apply(&mut world, command, &mut events);
    }
    let enemy = *query::enemy_view(&world)
        .get(EnemyId::new(0))
        .expect("enemy survives first hit");
    assert_eq!(enemy.state, EnemyState::Shot);
    assert_eq!(enemy.hit_count, 1);
}
