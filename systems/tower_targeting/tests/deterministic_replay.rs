use std::{
    collections::hash_map::DefaultHasher,
    hash::{Hash, Hasher},
};

use wave_defence_core::{
    Command, EnemyId, EnemyKind, EnemyStats, Event, Gold, Path, TowerId, TowerKind, TowerTarget,
    Vec2,
};
use wave_defence_system_tower_targeting::TowerTargeting;
use wave_defence_world::{self as world, query, World};

#[test]
fn deterministic_replay_prefers_leading_enemy() {
    let first = replay(scripted_commands());
    let second = replay(scripted_commands());

    assert_eq!(first, second, "replay diverged between runs");
    assert_eq!(first.fingerprint(), second.fingerprint());

    let spawned: Vec<_> = first
        .events
        .iter()
        .filter_map(|event| match event {
            EventRecord::EnemySpawned { enemy } => Some(*enemy),
            _ => None,
        })
        .collect();
    assert_eq!(spawned, vec![EnemyId::new(0), EnemyId::new(1)]);

    let targeted: Vec<_> = first
        .assignments
        .iter()
        .filter_map(|snapshot| snapshot.targets.first().map(|record| record.enemy))
        .collect();
    assert!(!targeted.is_empty(), "tower never acquired a target");
    assert_eq!(targeted.first(), Some(&EnemyId::new(0)));
    assert_eq!(
        targeted.last(),
        Some(&EnemyId::new(1)),
        "faster enemy should take the lead once it turns the corner first"
    );
}

#[test]
fn targets_always_lie_within_tower_range() {
    let mut world = build_world();
    let mut targeting = TowerTargeting::new();
    let mut targets = Vec::new();

    for command in scripted_commands() {
        let mut events = Vec::new();
        world::apply(&mut world, command, &mut events);

        let towers = query::tower_view(&world);
        let enemies = query::enemy_view(&world);
        targeting.handle(&towers, &enemies, &mut targets);

        for target in &targets {
            let tower = towers.get(target.tower).expect("target references a tower");
            let enemy = enemies
                .iter()
                .find(|enemy| enemy.id == target.enemy)
                .expect("target references a live enemy");
            assert!(tower.position.distance(enemy.position) <= tower.range);
            assert!(enemies
                .iter()
                .filter(|other| other.position.distance(tower.position) <= tower.range)
                .all(|other| other.path_index <= enemy.path_index));
        }
    }
}

fn build_world() -> World {
    let path = Path::new(vec![
        Vec2::new(0.0, 0.0),
        Vec2::new(60.0, 0.0),
        Vec2::new(60.0, 80.0),
        Vec2::new(200.0, 80.0),
    ])
    .expect("valid path");
    World::new(path, Gold::new(500), 20)
}

fn replay(commands: Vec<Command>) -> ReplayOutcome {
    let mut world = build_world();
    let mut targeting = TowerTargeting::new();
    let mut current_targets = Vec::new();
    let mut assignments = Vec::new();
    let mut events = Vec::new();

    for command in commands {
        let mut generated = Vec::new();
        world::apply(&mut world, command, &mut generated);
        events.extend(generated.into_iter().filter_map(EventRecord::from_event));

        let towers = query::tower_view(&world);
        let enemies = query::enemy_view(&world);
        targeting.handle(&towers, &enemies, &mut current_targets);

        assignments.push(TargetSnapshot::from(&current_targets));
    }

    ReplayOutcome {
        events,
        assignments,
    }
}

fn scripted_commands() -> Vec<Command> {
    let mut commands = vec![
        Command::PurchaseTower {
            kind: TowerKind::Basic,
            position: Vec2::new(40.0, 40.0),
        },
        Command::SpawnEnemy {
            kind: EnemyKind::Grunt,
            stats: EnemyStats::new(1_000.0, 1.0, Gold::new(10), 10),
        },
    ];
    for _ in 0..10 {
        commands.push(Command::Tick { dt: 1.0 });
        commands.push(Command::AdvanceEnemies);
    }
    commands.push(Command::SpawnEnemy {
        kind: EnemyKind::Runner,
        stats: EnemyStats::new(1_000.0, 4.0, Gold::new(8), 12),
    });
    for _ in 0..40 {
        commands.push(Command::Tick { dt: 1.0 });
        commands.push(Command::AdvanceEnemies);
    }
    commands
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
struct ReplayOutcome {
    events: Vec<EventRecord>,
    assignments: Vec<TargetSnapshot>,
}

impl ReplayOutcome {
    fn fingerprint(&self) -> u64 {
        let mut hasher = DefaultHasher::new();
        self.hash(&mut hasher);
        hasher.finish()
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
struct TargetSnapshot {
    targets: Vec<TargetRecord>,
}

impl TargetSnapshot {
    fn from(targets: &[TowerTarget]) -> Self {
        Self {
            targets: targets.iter().map(TargetRecord::from).collect(),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
struct TargetRecord {
    tower: TowerId,
    enemy: EnemyId,
    enemy_position: QuantizedPoint,
}

impl From<&TowerTarget> for TargetRecord {
    fn from(target: &TowerTarget) -> Self {
        Self {
            tower: target.tower,
            enemy: target.enemy,
            enemy_position: QuantizedPoint::from(target.enemy_position),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
struct QuantizedPoint {
    x_milli: i64,
    y_milli: i64,
}

impl From<Vec2> for QuantizedPoint {
    fn from(point: Vec2) -> Self {
        Self {
            x_milli: (point.x * 1_000.0).round() as i64,
            y_milli: (point.y * 1_000.0).round() as i64,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
enum EventRecord {
    TowerPurchased { tower: TowerId },
    EnemySpawned { enemy: EnemyId },
    EnemyLeaked { enemy: EnemyId },
}

impl EventRecord {
    fn from_event(event: Event) -> Option<Self> {
        match event {
            Event::TowerPurchased { tower, .. } => Some(Self::TowerPurchased { tower }),
            Event::EnemySpawned { enemy, .. } => Some(Self::EnemySpawned { enemy }),
            Event::EnemyLeaked { enemy, .. } => Some(Self::EnemyLeaked { enemy }),
            Event::TimeAdvanced { .. } => None,
            other => panic!("unexpected event during targeting replay: {other:?}"),
        }
    }
}
