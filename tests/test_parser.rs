use std::collections::HashMap;

use tile_runner::entities::*;
use tile_runner::parser::*;
use tile_runner::vector::Vector;

use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};

fn seeded_rng() -> StdRng {
    StdRng::seed_from_u64(42)
}

fn types(actors: &[Actor]) -> Vec<ActorType> {
    actors.iter().map(Actor::actor_type).collect()
}

// ── Symbol lookups ────────────────────────────────────────────────────────────

#[test]
fn obstacle_symbols() {
    assert_eq!(LevelParser::obstacle_from_symbol('x'), Some(Obstacle::Wall));
    assert_eq!(LevelParser::obstacle_from_symbol('!'), Some(Obstacle::Lava));
    assert_eq!(LevelParser::obstacle_from_symbol('.'), None);
    assert_eq!(LevelParser::obstacle_from_symbol(' '), None);
    assert_eq!(LevelParser::obstacle_from_symbol('@'), None);
}

#[test]
fn actor_symbols_come_from_the_table() {
    let parser = LevelParser::standard();
    for symbol in ['@', 'o', '=', '|', 'v'] {
        assert!(parser.actor_from_symbol(symbol).is_some(), "missing {}", symbol);
    }
    assert!(parser.actor_from_symbol('x').is_none());
    assert!(parser.actor_from_symbol('.').is_none());
}

#[test]
fn empty_table_knows_no_actors() {
    let parser = LevelParser::default();
    assert!(parser.actor_from_symbol('@').is_none());
    let actors = parser.create_actors(&["@o=|v"], &mut seeded_rng()).unwrap();
    assert!(actors.is_empty());
}

#[test]
fn factories_build_the_expected_variants() {
    let parser = LevelParser::standard();
    let mut rng = seeded_rng();
    let cell = Vector::new(2.0, 3.0);
    let build = |symbol: char, rng: &mut dyn RngCore| {
        let factory = parser.actor_from_symbol(symbol).unwrap();
        factory(cell, rng).unwrap()
    };

    assert_eq!(build('@', &mut rng).actor_type(), ActorType::Player);
    assert_eq!(build('o', &mut rng).actor_type(), ActorType::Coin);
    assert_eq!(build('=', &mut rng).speed, Vector::new(2.0, 0.0));
    assert_eq!(build('|', &mut rng).speed, Vector::new(0.0, 2.0));
    assert_eq!(build('v', &mut rng).speed, Vector::new(0.0, 3.0));
}

// ── create_grid ───────────────────────────────────────────────────────────────

#[test]
fn grid_maps_each_character() {
    let grid = LevelParser::standard().create_grid(&["@o", "x!"]);
    assert_eq!(
        grid.rows(),
        &[vec![None, None], vec![Some(Obstacle::Wall), Some(Obstacle::Lava)]]
    );
}

#[test]
fn ragged_plan_is_padded() {
    let grid = LevelParser::standard().create_grid(&["x", "x.!"]);
    assert_eq!(grid.width(), 3);
    assert_eq!(grid.height(), 2);
    assert_eq!(grid.rows()[0], vec![Some(Obstacle::Wall), None, None]);
}

#[test]
fn empty_plan_gives_empty_grid() {
    let plan: [&str; 0] = [];
    let grid = LevelParser::standard().create_grid(&plan);
    assert_eq!(grid.width(), 0);
    assert_eq!(grid.height(), 0);
}

// ── create_actors ─────────────────────────────────────────────────────────────

#[test]
fn actors_in_discovery_order() {
    let actors = LevelParser::standard()
        .create_actors(&["=o", "@|"], &mut seeded_rng())
        .unwrap();
    assert_eq!(
        types(&actors),
        vec![ActorType::Fireball, ActorType::Coin, ActorType::Player, ActorType::Fireball]
    );
    assert_eq!(actors[0].pos, Vector::new(0.0, 0.0));
    assert_eq!(actors[3].pos, Vector::new(1.0, 1.0));
}

#[test]
fn unknown_symbols_are_skipped() {
    let actors = LevelParser::standard()
        .create_actors(&["#$%@?"], &mut seeded_rng())
        .unwrap();
    assert_eq!(types(&actors), vec![ActorType::Player]);
    assert_eq!(actors[0].pos, Vector::new(3.0, -0.5));
}

#[test]
fn custom_table() {
    let mut symbols: HashMap<char, ActorFactory> = HashMap::new();
    symbols.insert('c', |cell, rng| Actor::coin(cell, rng));
    let parser = LevelParser::new(symbols);

    let actors = parser.create_actors(&["c@c"], &mut seeded_rng()).unwrap();
    assert_eq!(types(&actors), vec![ActorType::Coin, ActorType::Coin]);
}

// ── parse ─────────────────────────────────────────────────────────────────────

#[test]
fn parse_builds_the_level() {
    let level = LevelParser::standard()
        .parse(&["@o", "x!"], &mut seeded_rng())
        .unwrap();

    assert_eq!(level.height(), 2);
    assert_eq!(level.width(), 2);
    assert_eq!(level.grid().cell(0, 1), Some(Obstacle::Wall));
    assert_eq!(level.grid().cell(1, 1), Some(Obstacle::Lava));
    assert_eq!(level.grid().cell(0, 0), None);

    let actors = level.actors();
    assert_eq!(types(actors), vec![ActorType::Player, ActorType::Coin]);
    assert_eq!(actors[0].pos, Vector::new(0.0, -0.5));
    assert!((actors[1].pos.x - 1.2).abs() < 1e-12);
    assert!((actors[1].pos.y - 0.1).abs() < 1e-12);
    assert_eq!(level.player_id(), Some(actors[0].id()));
}

#[test]
fn parse_accepts_owned_rows() {
    let plan = vec!["..".to_string(), "@.".to_string()];
    let level = LevelParser::standard().parse(&plan, &mut seeded_rng()).unwrap();
    assert!(level.player().is_some());
}

#[test]
fn same_seed_same_coins() {
    let parser = LevelParser::standard();
    let plan = ["o.o.o"];
    let a = parser.parse(&plan, &mut seeded_rng()).unwrap();
    let b = parser.parse(&plan, &mut seeded_rng()).unwrap();
    let phases = |level: &tile_runner::level::Level| -> Vec<f64> {
        level
            .actors()
            .iter()
            .filter_map(|a| match a.kind() {
                ActorKind::Coin(spring) => Some(spring.phase),
                _ => None,
            })
            .collect()
    };
    assert_eq!(phases(&a), phases(&b));
    assert_eq!(phases(&a).len(), 3);
}

#[test]
fn parser_is_reusable() {
    let parser = LevelParser::standard();
    let mut rng = seeded_rng();
    let first = parser.parse(&["@"], &mut rng).unwrap();
    let second = parser.parse(&["@"], &mut rng).unwrap();
    assert_ne!(first.player_id(), second.player_id());
}
