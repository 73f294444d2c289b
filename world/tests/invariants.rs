use micromouse_core::{
    center_goals, CellCoord, Command, Direction, KnowledgeMode, RunStatus, SimulationConfig,
    TripPlan, WallPlacement, UNREACHABLE,
};
use micromouse_world::{self as world, query, DistanceField, Maze, World};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

const SEEDS: [u64; 6] = [1, 7, 42, 1_337, 0x5eed, 0xdead_beef];

fn random_layout(rng: &mut ChaCha8Rng, size: u32, count: usize) -> Vec<WallPlacement> {
    (0..count)
        .map(|_| {
            let direction = Direction::ALL[rng.gen_range(0..Direction::ALL.len())];
            WallPlacement::new(rng.gen_range(0..size), rng.gen_range(0..size), direction)
        })
        .collect()
}

fn random_maze(seed: u64) -> Maze {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let size = rng.gen_range(4..=9);
    let mut maze = Maze::new(size);
    for wall in random_layout(&mut rng, size, usize::try_from(size * 2).expect("fits")) {
        let _ = maze
            .toggle_wall(wall.cell(), wall.direction)
            .expect("generated in bounds");
        assert!(maze.is_consistent(), "mirror broken after toggling {wall:?}");
    }
    maze
}

fn open_neighbors(maze: &Maze, cell: CellCoord) -> impl Iterator<Item = CellCoord> + '_ {
    Direction::ALL.into_iter().filter_map(move |direction| {
        if maze.has_wall(cell, direction) {
            None
        } else {
            cell.neighbor(direction, maze.size())
        }
    })
}

#[test]
fn random_edits_keep_walls_mirrored() {
    for seed in SEEDS {
        let maze = random_maze(seed);
        assert!(maze.is_consistent(), "seed {seed}");
    }
}

#[test]
fn distance_field_satisfies_shortest_path_equations() {
    for seed in SEEDS {
        let maze = random_maze(seed);
        let goals = center_goals(maze.size());
        let field = DistanceField::compute(&maze, &goals);

        for cell in maze.cells() {
            let distance = field.distance(cell).expect("in bounds");
            if goals.contains(&cell) {
                assert_eq!(distance, 0, "seed {seed}: goal {cell}");
                continue;
            }

            let best_neighbor = open_neighbors(&maze, cell)
                .map(|neighbor| field.distance(neighbor).expect("in bounds"))
                .min()
                .unwrap_or(UNREACHABLE);

            if best_neighbor == UNREACHABLE {
                assert_eq!(distance, UNREACHABLE, "seed {seed}: isolated {cell}");
            } else {
                assert_eq!(distance, best_neighbor + 1, "seed {seed}: cell {cell}");
            }
        }
    }
}

#[test]
fn distance_field_is_idempotent() {
    for seed in SEEDS {
        let maze = random_maze(seed);
        let goals = center_goals(maze.size());

        let first = DistanceField::compute(&maze, &goals);
        let mut second = first.clone();
        second.rebuild(&maze, &goals);

        assert_eq!(first, second, "seed {seed}");
    }
}

#[test]
fn knowledge_only_grows_and_stays_truthful() {
    for seed in SEEDS {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let size = rng.gen_range(5..=8);
        let layout = random_layout(&mut rng, size, usize::try_from(size * 3).expect("fits"));
        let config = SimulationConfig {
            trip: TripPlan::speed_run(),
            knowledge: KnowledgeMode::Discover,
            ..SimulationConfig::with_size(size)
        };
        let mut world = World::with_layout(config, &layout).expect("generated in bounds");
        let mut events = Vec::new();
        world::apply(&mut world, Command::StartRun, &mut events);

        let mut known = query::known_wall_count(&world);
        for _ in 0..2_000 {
            if matches!(query::status(&world), RunStatus::Done | RunStatus::Stalled) {
                break;
            }
            world::apply(&mut world, Command::Tick, &mut events);

            let now = query::known_wall_count(&world);
            assert!(now >= known, "seed {seed}: knowledge shrank");
            known = now;
            assert!(
                query::knowledge_maze(&world).is_subset_of(query::truth_maze(&world)),
                "seed {seed}: knowledge invented a wall"
            );
            assert!(query::knowledge_maze(&world).is_consistent());
        }

        assert!(
            matches!(query::status(&world), RunStatus::Done | RunStatus::Stalled),
            "seed {seed}: run neither finished nor stalled"
        );
    }
}
