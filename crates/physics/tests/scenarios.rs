//! End-to-end movement scenarios through the public controller API.

use firstperson_physics::movement::is_walkable_surface;
use firstperson_physics::{
    CharacterController, CollisionQuery, CollisionWorld, CommandButtons, ContentFlags, HitResult,
    MovementConfig, MovementEvent, MovementMode, MovementState, ObjectId, PhysicsVolume,
    PlayerCommand, QueryFilter, StepDownResult,
};
use glam::Vec3;

const DT: f32 = 1.0 / 60.0;
const STANDING_Z: f32 = 88.0 + 2.15;

// ============================================================================
// Helpers
// ============================================================================

/// Flat floor with its top at z = 0.
fn floor_world() -> CollisionWorld {
    let mut world = CollisionWorld::new();
    world.add_box(
        Vec3::new(0.0, 0.0, -50.0),
        Vec3::new(5000.0, 5000.0, 50.0),
        ContentFlags::SOLID,
    );
    world
}

/// Flat floor plus a box whose near face is at x = 60.
fn step_world(step_height: f32) -> CollisionWorld {
    let mut world = floor_world();
    world.add_box(
        Vec3::new(160.0, 0.0, step_height * 0.5),
        Vec3::new(100.0, 200.0, step_height * 0.5),
        ContentFlags::SOLID,
    );
    world
}

fn spawn(world: &CollisionWorld, location: Vec3) -> (CharacterController, MovementState) {
    let controller = CharacterController::with_default_config();
    let mut state = controller.new_state(location);
    controller.spawn_at(&mut state, world, location);
    (controller, state)
}

fn mode_changes(events: &[MovementEvent]) -> Vec<(MovementMode, MovementMode)> {
    events
        .iter()
        .filter_map(|e| match e {
            MovementEvent::ModeChanged { from, to } => Some((*from, *to)),
            _ => None,
        })
        .collect()
}

/// Every mode change starts from the mode the previous one ended in.
fn assert_mode_chain(start: MovementMode, events: &[MovementEvent], end: MovementMode) {
    let mut mode = start;
    for (from, to) in mode_changes(events) {
        assert_eq!(from, mode, "mode change out of order");
        assert_ne!(from, to, "mode change to the same mode");
        mode = to;
    }
    assert_eq!(mode, end);
}

// ============================================================================
// Scenarios
// ============================================================================

#[test]
fn test_01_rest_on_flat_floor() {
    let world = floor_world();
    let volume = PhysicsVolume::default();
    let (controller, mut state) = spawn(&world, Vec3::new(0.0, 0.0, STANDING_Z));
    let start = state.position;

    for _ in 0..60 {
        let events = controller.update(&mut state, &PlayerCommand::default(), &world, &volume, DT);
        assert!(events.is_empty(), "unexpected events {events:?}");
    }

    assert_eq!(state.mode, MovementMode::Walking);
    assert_eq!(state.position, start);
    assert_eq!(state.velocity, Vec3::ZERO);
}

#[test]
fn test_02_accelerate_to_walk_speed() {
    let world = floor_world();
    let volume = PhysicsVolume::default();
    let (controller, mut state) = spawn(&world, Vec3::new(0.0, 0.0, STANDING_Z));
    let max_speed = controller.config.max_walk_speed;
    let command = PlayerCommand::moving(1.0, 0.0);

    let mut previous = 0.0;
    for _ in 0..60 {
        controller.update(&mut state, &command, &world, &volume, DT);
        let speed = state.horizontal_speed();
        assert!(speed <= max_speed + 0.05, "speed {speed}");
        assert!(speed + 1e-3 >= previous, "slowed down without braking");
        previous = speed;
    }

    assert_eq!(state.mode, MovementMode::Walking);
    assert!((state.horizontal_speed() - max_speed).abs() < 0.5);
    assert!(state.velocity.x > 0.0);
    assert!((state.position.z - STANDING_Z).abs() < 0.5);
}

#[test]
fn test_03_fall_and_land() {
    let world = floor_world();
    let volume = PhysicsVolume::default();
    // Feet 100 units above the floor
    let (controller, mut state) = spawn(&world, Vec3::new(0.0, 0.0, 188.0));
    assert_eq!(state.mode, MovementMode::Falling);

    let mut landed_at = None;
    let mut all_events = Vec::new();
    for tick in 1..=60 {
        let events = controller.update(&mut state, &PlayerCommand::default(), &world, &volume, DT);
        if landed_at.is_none() && events.iter().any(|e| matches!(e, MovementEvent::Landed { .. })) {
            landed_at = Some(tick);
        }
        all_events.extend(events);
    }

    let tick = landed_at.expect("character landed");
    assert!((25..=29).contains(&tick), "landed on tick {tick}");
    assert_eq!(state.mode, MovementMode::Walking);
    assert_eq!(state.velocity.z, 0.0);
    assert_eq!(state.jumps_remaining, 1);
    assert!((state.foot_location().z - 2.15).abs() < 0.3);
    assert_mode_chain(MovementMode::Falling, &all_events, MovementMode::Walking);
}

#[test]
fn test_04_falling_keeps_horizontal_velocity() {
    let world = floor_world();
    let volume = PhysicsVolume::default();
    let (controller, mut state) = spawn(&world, Vec3::new(0.0, 0.0, 1000.0));
    state.velocity = Vec3::new(200.0, 0.0, 0.0);

    for _ in 0..10 {
        controller.update(&mut state, &PlayerCommand::default(), &world, &volume, DT);
    }

    assert_eq!(state.mode, MovementMode::Falling);
    assert!((state.velocity.x - 200.0).abs() < 1.0);
    assert!(state.velocity.y.abs() < 1e-3);
    assert!((state.position.x - 200.0 * 10.0 * DT).abs() < 1.0);
    assert!(state.velocity.z < 0.0);
}

#[test]
fn test_04b_landing_zeroes_only_vertical_velocity() {
    let world = floor_world();
    let volume = PhysicsVolume::default();
    let (controller, mut state) = spawn(&world, Vec3::new(0.0, 0.0, 188.0));
    state.velocity = Vec3::new(200.0, 0.0, 0.0);

    let mut landed = false;
    for _ in 0..60 {
        let events = controller.update(&mut state, &PlayerCommand::default(), &world, &volume, DT);
        if events.iter().any(|e| matches!(e, MovementEvent::Landed { .. })) {
            landed = true;
            break;
        }
    }

    assert!(landed);
    assert_eq!(state.mode, MovementMode::Walking);
    assert_eq!(state.velocity.z, 0.0);
    assert!((state.velocity.x - 200.0).abs() < 1.0, "vx {}", state.velocity.x);
}

#[test]
fn test_05_step_onto_low_box() {
    let world = step_world(20.0);
    let (controller, mut state) = spawn(&world, Vec3::new(0.0, 0.0, STANDING_Z));
    assert_eq!(state.mode, MovementMode::Walking);

    // Move up against the face of the step
    let start = state.position;
    let hit = world.sweep_capsule(
        start,
        start + Vec3::new(100.0, 0.0, 0.0),
        state.orientation,
        state.capsule,
        &QueryFilter::default(),
    );
    assert!(hit.is_valid_blocking_hit());
    state.position = hit.location;

    let before_z = state.position.z;
    let mut out = StepDownResult::default();
    let (stepped, _) = controller.step_up(
        &mut state,
        &world,
        Vec3::NEG_Z,
        Vec3::new(40.0, 0.0, 0.0),
        &hit,
        Some(&mut out),
    );

    assert!(stepped);
    assert!((state.position.z - before_z - 17.85).abs() < 0.5);
    assert!(out.floor.is_some_and(|floor| floor.is_walkable_floor()));
}

#[test]
fn test_06_tall_box_blocks_step() {
    let world = step_world(60.0);
    let (controller, mut state) = spawn(&world, Vec3::new(0.0, 0.0, STANDING_Z));

    let start = state.position;
    let hit = world.sweep_capsule(
        start,
        start + Vec3::new(100.0, 0.0, 0.0),
        state.orientation,
        state.capsule,
        &QueryFilter::default(),
    );
    state.position = hit.location;
    let before = state.position;

    let (stepped, events) = controller.step_up(
        &mut state,
        &world,
        Vec3::NEG_Z,
        Vec3::new(40.0, 0.0, 0.0),
        &hit,
        None,
    );

    assert!(!stepped);
    assert_eq!(state.position, before);

    // The raised capsule still runs into the face of the box
    let impact = events.iter().find_map(|e| match e {
        MovementEvent::Impact { hit } => Some(hit),
        _ => None,
    });
    assert!(impact.is_some_and(|hit| hit.normal.x < -0.99));
}

#[test]
fn test_07_crouch_switches_capsule_at_halfway() {
    let world = floor_world();
    let volume = PhysicsVolume::default();
    let (controller, mut state) = spawn(&world, Vec3::new(0.0, 0.0, STANDING_Z));
    let config = controller.config.clone();
    let crouch = PlayerCommand::default().with_button(CommandButtons::CROUCH);

    let mut switched_at = None;
    for tick in 1..=30 {
        let events = controller.update(&mut state, &crouch, &world, &volume, DT);
        if events.contains(&MovementEvent::CrouchChanged { crouched: true }) {
            switched_at = Some(tick);
            assert_eq!(state.capsule.half_height, config.crouched_half_height);
        }
    }

    let elapsed = switched_at.expect("capsule switched") as f32 * DT;
    assert!(elapsed >= config.time_to_crouch * 0.5 - 1e-4);
    assert!(elapsed <= config.time_to_crouch * 0.5 + DT + 1e-4);
    assert!(state.is_crouching());
    assert!((state.foot_location().z - 2.15).abs() < 0.3);

    // Release and stand back up
    for _ in 0..30 {
        controller.update(&mut state, &PlayerCommand::default(), &world, &volume, DT);
    }
    assert_eq!(state.capsule.half_height, config.capsule_half_height);
    assert_eq!(state.crouch.crouch_fraction, 0.0);
}

#[test]
fn test_08_jump_and_land() {
    let world = floor_world();
    let volume = PhysicsVolume::default();
    let (controller, mut state) = spawn(&world, Vec3::new(0.0, 0.0, STANDING_Z));
    let jump = PlayerCommand::default().with_button(CommandButtons::JUMP);

    let mut events = controller.update(&mut state, &jump, &world, &volume, DT);
    assert!(events.contains(&MovementEvent::Jumped));
    assert_eq!(state.jumps_remaining, 0);

    let mut peak = state.position.z;
    for _ in 0..90 {
        events.extend(controller.update(&mut state, &PlayerCommand::default(), &world, &volume, DT));
        peak = peak.max(state.position.z);
    }

    // v^2 / 2g
    let apex = controller.config.jump_z_velocity.powi(2) / (2.0 * 980.0);
    assert!(peak - STANDING_Z > apex * 0.9, "peak {peak}");
    assert_eq!(state.mode, MovementMode::Walking);
    assert_eq!(state.jumps_remaining, 1);
    assert_mode_chain(MovementMode::Walking, &events, MovementMode::Walking);
}

#[test]
fn test_09_sprint_crouch_starts_slide_that_runs_out() {
    let world = floor_world();
    let volume = PhysicsVolume::default();
    let (controller, mut state) = spawn(&world, Vec3::new(0.0, 0.0, STANDING_Z));
    let sprint = PlayerCommand::moving(1.0, 0.0).with_button(CommandButtons::SPRINT);

    for _ in 0..90 {
        controller.update(&mut state, &sprint, &world, &volume, DT);
    }
    assert!(state.is_sprinting);
    assert!(state.horizontal_speed() > controller.config.start_slide_speed_minimum);

    let crouch = PlayerCommand::default().with_button(CommandButtons::CROUCH);
    let mut events = controller.update(&mut state, &crouch, &world, &volume, DT);
    assert_eq!(state.mode, MovementMode::Sliding);
    assert!(!state.is_sprinting);

    for _ in 0..180 {
        events.extend(controller.update(&mut state, &crouch, &world, &volume, DT));
        if state.mode != MovementMode::Sliding {
            break;
        }
        // Friction only ever slows a slide on flat ground
        assert!(state.horizontal_speed() <= controller.config.max_sprint_speed + 1.0);
    }

    assert_eq!(state.mode, MovementMode::Walking);
    assert!(state.horizontal_speed() <= controller.config.slide_speed_threshold + 1.0);
    assert_mode_chain(MovementMode::Walking, &events, MovementMode::Walking);
}

// ============================================================================
// Properties
// ============================================================================

#[test]
fn test_walkability_is_monotonic_in_normal_z() {
    let config = MovementConfig::default();
    let mut was_walkable = false;

    // From vertical wall to flat floor
    for i in 0..=90 {
        let angle = (90 - i) as f32;
        let radians = angle.to_radians();
        let normal = Vec3::new(-radians.sin(), 0.0, radians.cos());
        let hit = HitResult::hit(Vec3::ZERO, Vec3::NEG_Z, 0.5, normal, ObjectId(0));

        let walkable = is_walkable_surface(&hit, config.walkable_floor_z);
        assert!(walkable || !was_walkable, "walkable at a steeper angle but not at {angle}");
        was_walkable = walkable;
    }
    assert!(was_walkable);
}

#[test]
fn test_turning_never_exceeds_acceleration() {
    let world = floor_world();
    let volume = PhysicsVolume::default();
    let (controller, mut state) = spawn(&world, Vec3::new(0.0, 0.0, STANDING_Z));
    let config = controller.config.clone();

    for _ in 0..60 {
        controller.update(&mut state, &PlayerCommand::moving(1.0, 0.0), &world, &volume, DT);
    }

    // Hard turn to the side
    let limit = config.walk_acceleration.max(config.braking_deceleration_walking) * DT;
    for _ in 0..60 {
        let before = state.velocity;
        controller.update(&mut state, &PlayerCommand::moving(0.0, 1.0), &world, &volume, DT);
        let change = (state.velocity - before).truncate().length();
        assert!(change <= limit + 0.1, "velocity changed by {change}");
    }
}

#[test]
fn test_crouch_press_ends_sprint_then_crouches() {
    let world = floor_world();
    let volume = PhysicsVolume::default();
    let (controller, mut state) = spawn(&world, Vec3::new(0.0, 0.0, STANDING_Z));
    let sprint = PlayerCommand::moving(1.0, 0.0).with_button(CommandButtons::SPRINT);
    controller.update(&mut state, &sprint, &world, &volume, DT);
    assert!(state.is_sprinting);

    // Too slow to slide: the crouch request ends the sprint and the blend starts
    let mut both = sprint.clone();
    both.buttons.press(CommandButtons::CROUCH);
    controller.update(&mut state, &both, &world, &volume, DT);
    assert!(!state.is_sprinting);
    assert_eq!(state.mode, MovementMode::Walking);
    let crouched = state.crouch.crouch_fraction;
    assert!(crouched > 0.0);

    // Letting go of crouch blends back toward standing
    let mut released = both;
    released.buttons.release(CommandButtons::CROUCH);
    controller.update(&mut state, &released, &world, &volume, DT);
    assert!(!state.crouch.wants_to_crouch);
    assert!(state.crouch.crouch_fraction < crouched);
}
