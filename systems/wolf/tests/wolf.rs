use std::collections::{BTreeSet, VecDeque};

use prowl_core::{
    AgentId, Command, Direction, Event, Position, TileCode, TileGrid, TilePoint, Walkability,
};
use prowl_system_wolf::{DirectionSource, Wolf, WolfMode, WolfTuning};
use prowl_world::{self as world, query, World};

const TILE: f32 = 32.0;

/// Hands out scripted picks and optionally reverses shuffled candidates.
#[derive(Default)]
struct Scripted {
    picks: VecDeque<Direction>,
    reverse_shuffles: bool,
    picks_taken: usize,
}

impl Scripted {
    fn picks(picks: &[Direction]) -> Self {
        Self {
            picks: picks.iter().copied().collect(),
            ..Self::default()
        }
    }
}

impl DirectionSource for Scripted {
    fn pick(&mut self) -> Direction {
        self.picks_taken += 1;
        self.picks.pop_front().expect("scripted pick available")
    }

    fn shuffle(&mut self, candidates: &mut [Direction]) {
        if self.reverse_shuffles {
            candidates.reverse();
        }
    }
}

fn open_grid(columns: usize, rows: usize, trees: &[(i32, i32)]) -> TileGrid {
    let mut cells = vec![vec![TileCode::new(1); columns]; rows];
    for &(column, row) in trees {
        cells[row as usize][column as usize] = TileCode::new(0);
    }
    TileGrid::from_rows(
        cells,
        32,
        Walkability::Blocking(BTreeSet::from([TileCode::new(0)])),
    )
    .expect("valid grid")
}

fn at_tile(column: i32, row: i32) -> Position {
    Position::new(column as f32 * TILE, row as f32 * TILE)
}

fn tick(world: &mut World, wolf: &mut Wolf, directions: &mut Scripted) -> Vec<Event> {
    let mut events = Vec::new();
    world::apply(world, Command::Tick, &mut events);

    let mut commands = Vec::new();
    wolf.handle(
        &events,
        query::agent(world, AgentId::Wolf),
        query::agent(world, AgentId::Player),
        query::tile_grid(world),
        directions,
        &mut commands,
    );
    for command in commands {
        world::apply(world, command, &mut events);
    }
    events
}

fn move_player(world: &mut World, direction: Direction, distance: f32) {
    let mut events = Vec::new();
    world::apply(
        world,
        Command::MoveAgent {
            agent: AgentId::Player,
            direction,
            distance,
        },
        &mut events,
    );
    assert!(
        events
            .iter()
            .any(|event| matches!(event, Event::AgentMoved { .. })),
        "player move should succeed"
    );
}

fn wolf_position(world: &World) -> Position {
    query::agent(world, AgentId::Wolf).position
}

#[test]
fn idle_turns_into_patrol_exactly_once() {
    let mut world = World::new(open_grid(20, 20, &[]), at_tile(0, 0), at_tile(12, 12));
    let mut wolf = Wolf::new(WolfTuning {
        idle_duration: 3,
        move_interval: 100,
        ..WolfTuning::default()
    });
    let mut directions = Scripted::picks(&[Direction::Right]);

    let _ = tick(&mut world, &mut wolf, &mut directions);
    let _ = tick(&mut world, &mut wolf, &mut directions);
    assert_eq!(wolf.mode(), WolfMode::Idle { idle_ticks: 2 });

    let _ = tick(&mut world, &mut wolf, &mut directions);
    assert_eq!(
        wolf.mode(),
        WolfMode::Patrolling {
            heading: Direction::Right,
            patrol_ticks: 0,
        }
    );
    assert_eq!(wolf_position(&world), at_tile(12, 12));

    for _ in 0..20 {
        let _ = tick(&mut world, &mut wolf, &mut directions);
    }
    assert_eq!(directions.picks_taken, 1);
    assert_eq!(
        wolf_position(&world),
        Position::new(12.0 * TILE + 40.0, 12.0 * TILE)
    );
}

#[test]
fn detection_preempts_idle_on_the_same_tick() {
    let mut world = World::new(open_grid(20, 20, &[]), at_tile(0, 5), at_tile(10, 5));
    let mut wolf = Wolf::new(WolfTuning::default());
    let mut directions = Scripted::default();

    for _ in 0..10 {
        let _ = tick(&mut world, &mut wolf, &mut directions);
    }
    assert_eq!(wolf.mode(), WolfMode::Idle { idle_ticks: 10 });

    for _ in 0..3 {
        move_player(&mut world, Direction::Right, 2.0 * TILE);
    }
    let _ = tick(&mut world, &mut wolf, &mut directions);
    assert!(matches!(wolf.mode(), WolfMode::Chasing { .. }));

    move_player(&mut world, Direction::Left, 4.0 * TILE);
    let _ = tick(&mut world, &mut wolf, &mut directions);
    assert_eq!(wolf.mode(), WolfMode::Idle { idle_ticks: 1 });
}

#[test]
fn losing_the_player_counts_idle_on_the_same_tick() {
    let mut world = World::new(open_grid(20, 20, &[]), at_tile(5, 5), at_tile(8, 5));
    let mut wolf = Wolf::new(WolfTuning {
        idle_duration: 3,
        ..WolfTuning::default()
    });
    let mut directions = Scripted::picks(&[Direction::Up]);

    let _ = tick(&mut world, &mut wolf, &mut directions);
    assert!(matches!(wolf.mode(), WolfMode::Chasing { .. }));

    move_player(&mut world, Direction::Down, 12.0 * TILE);
    let _ = tick(&mut world, &mut wolf, &mut directions);
    assert_eq!(wolf.mode(), WolfMode::Idle { idle_ticks: 1 });

    let _ = tick(&mut world, &mut wolf, &mut directions);
    assert_eq!(wolf.mode(), WolfMode::Idle { idle_ticks: 2 });

    let _ = tick(&mut world, &mut wolf, &mut directions);
    assert_eq!(
        wolf.mode(),
        WolfMode::Patrolling {
            heading: Direction::Up,
            patrol_ticks: 0,
        }
    );
}

#[test]
fn detection_preempts_patrol() {
    let mut world = World::new(open_grid(20, 20, &[]), at_tile(0, 0), at_tile(12, 12));
    let mut wolf = Wolf::new(WolfTuning {
        idle_duration: 1,
        ..WolfTuning::default()
    });
    let mut directions = Scripted::picks(&[Direction::Down]);

    let _ = tick(&mut world, &mut wolf, &mut directions);
    let _ = tick(&mut world, &mut wolf, &mut directions);
    assert!(matches!(wolf.mode(), WolfMode::Patrolling { .. }));

    move_player(&mut world, Direction::Right, 10.0 * TILE);
    move_player(&mut world, Direction::Down, 10.0 * TILE);
    let _ = tick(&mut world, &mut wolf, &mut directions);

    assert!(matches!(wolf.mode(), WolfMode::Chasing { .. }));
}

#[test]
fn wolf_three_tiles_away_chases_along_x_first() {
    let mut world = World::new(open_grid(12, 12, &[]), at_tile(5, 5), at_tile(8, 5));
    let mut wolf = Wolf::new(WolfTuning::default());
    let mut directions = Scripted::default();

    let events = tick(&mut world, &mut wolf, &mut directions);

    assert_eq!(wolf.mode(), WolfMode::Chasing { rodeo_ticks: 0 });
    assert!(events.contains(&Event::AgentMoved {
        agent: AgentId::Wolf,
        direction: Direction::Left,
        from: at_tile(8, 5),
        to: Position::new(8.0 * TILE - 2.0, 5.0 * TILE),
    }));
}

#[test]
fn dominant_axis_is_tried_first() {
    let mut world = World::new(
        open_grid(12, 12, &[]),
        at_tile(5, 5),
        Position::new(8.0 * TILE, 5.0 * TILE + 8.0),
    );
    let mut wolf = Wolf::new(WolfTuning::default());

    let _ = tick(&mut world, &mut wolf, &mut Scripted::default());

    assert_eq!(
        wolf_position(&world),
        Position::new(8.0 * TILE - 2.0, 5.0 * TILE + 8.0)
    );
    assert_eq!(query::agent(&world, AgentId::Wolf).facing, Direction::Left);
}

#[test]
fn blocked_horizontal_falls_back_to_vertical() {
    let mut world = World::new(open_grid(12, 12, &[(7, 6)]), at_tile(5, 5), at_tile(8, 6));
    let mut wolf = Wolf::new(WolfTuning::default());

    let _ = tick(&mut world, &mut wolf, &mut Scripted::default());

    assert_eq!(
        wolf_position(&world),
        Position::new(8.0 * TILE, 6.0 * TILE - 2.0)
    );
    assert_eq!(query::agent(&world, AgentId::Wolf).facing, Direction::Up);
    assert_eq!(wolf.mode(), WolfMode::Chasing { rodeo_ticks: 0 });
}

#[test]
fn close_wolf_waits_between_evasive_steps() {
    let mut world = World::new(open_grid(12, 12, &[]), at_tile(5, 5), at_tile(6, 5));
    let mut wolf = Wolf::new(WolfTuning::default());
    let mut directions = Scripted::default();

    for _ in 0..29 {
        let events = tick(&mut world, &mut wolf, &mut directions);
        assert!(!events
            .iter()
            .any(|event| matches!(event, Event::AgentMoved { .. })));
    }
    assert_eq!(wolf.mode(), WolfMode::Chasing { rodeo_ticks: 29 });

    let _ = tick(&mut world, &mut wolf, &mut directions);
    assert_eq!(
        wolf_position(&world),
        Position::new(6.0 * TILE - 2.0, 5.0 * TILE)
    );

    for _ in 0..29 {
        let _ = tick(&mut world, &mut wolf, &mut directions);
    }
    assert_eq!(
        wolf_position(&world),
        Position::new(6.0 * TILE - 2.0, 5.0 * TILE)
    );
    let _ = tick(&mut world, &mut wolf, &mut directions);
    assert_eq!(
        wolf_position(&world),
        Position::new(6.0 * TILE - 4.0, 5.0 * TILE)
    );
}

#[test]
fn evasive_step_follows_shuffled_order() {
    let mut world = World::new(open_grid(12, 12, &[]), at_tile(5, 5), at_tile(6, 6));
    let mut wolf = Wolf::new(WolfTuning {
        rodeo_wait: 1,
        ..WolfTuning::default()
    });
    let mut directions = Scripted {
        reverse_shuffles: true,
        ..Scripted::default()
    };

    let _ = tick(&mut world, &mut wolf, &mut directions);

    assert_eq!(
        wolf_position(&world),
        Position::new(6.0 * TILE, 6.0 * TILE - 2.0)
    );
    assert_eq!(query::agent(&world, AgentId::Wolf).facing, Direction::Up);
}

#[test]
fn boxed_in_patrol_turns_but_never_moves() {
    let trees = [(4, 5), (6, 5), (5, 4), (5, 6)];
    let mut world = World::new(open_grid(11, 11, &trees), at_tile(0, 0), at_tile(5, 5));
    let mut wolf = Wolf::new(WolfTuning {
        idle_duration: 1,
        move_interval: 3,
        ..WolfTuning::default()
    });
    let mut directions = Scripted::picks(&[
        Direction::Right,
        Direction::Down,
        Direction::Left,
        Direction::Up,
    ]);

    let mut facings = Vec::new();
    for _ in 0..10 {
        let _ = tick(&mut world, &mut wolf, &mut directions);
        facings.push(query::agent(&world, AgentId::Wolf).facing);
        assert_eq!(wolf_position(&world), at_tile(5, 5));
    }

    assert_eq!(
        facings,
        vec![
            Direction::Down,
            Direction::Right,
            Direction::Right,
            Direction::Down,
            Direction::Down,
            Direction::Down,
            Direction::Left,
            Direction::Left,
            Direction::Left,
            Direction::Up,
        ]
    );
}

#[test]
fn repeated_blocked_chase_changes_nothing() {
    let trees = [(4, 5), (6, 5), (5, 4), (5, 6)];
    let grid = open_grid(11, 11, &trees);
    assert!(grid.is_walkable_tile(TilePoint::new(8, 5)));
    let mut world = World::new(grid, at_tile(8, 5), at_tile(5, 5));
    let mut wolf = Wolf::new(WolfTuning::default());
    let mut directions = Scripted::default();

    for _ in 0..200 {
        let events = tick(&mut world, &mut wolf, &mut directions);
        assert_eq!(
            events,
            vec![Event::TimeAdvanced {
                tick: query::tick_index(&world)
            }]
        );
    }

    let snapshot = query::agent(&world, AgentId::Wolf);
    assert_eq!(snapshot.position, at_tile(5, 5));
    assert_eq!(snapshot.facing, Direction::Down);
    assert!(matches!(wolf.mode(), WolfMode::Chasing { .. }));
}
