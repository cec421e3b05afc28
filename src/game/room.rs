//! Procedural Room Generation
//!
//! Builds an immutable `RoomDescriptor` from the run RNG. The draw order is
//! part of the contract: layout, enemies, items, boss. Reordering any step
//! changes every room generated from a given seed.

use std::fmt;
use std::str::FromStr;
use serde::{Serialize, Deserialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::core::hash::{StateHash, StateHasher};
use crate::core::rng::DeterministicRng;
use crate::core::vec2::{Point, Rect};
use crate::game::amulet::{select_amulet_by_rarity, AmuletDefinition};
use crate::game::enemy::EnemyKind;

/// Perimeter wall tile size.
pub const TILE_SIZE: i32 = 32;

/// Perimeter wall thickness.
pub const WALL_THICKNESS: i32 = 40;

/// Inset of the perimeter walls from the room edge.
pub const WALL_INSET: i32 = 20;

/// Spawn margin from the left/right edges.
pub const MARGIN_X: i32 = 50;

/// Spawn margin from the top/bottom edges.
pub const MARGIN_Y: i32 = 50;

/// Interior obstacles stay this far from the edges.
pub const OBSTACLE_MARGIN: i32 = 150;

/// Obstacle side length range.
pub const OBSTACLE_MIN_SIZE: i32 = 40;
/// Obstacle side length range.
pub const OBSTACLE_MAX_SIZE: i32 = 120;

/// Interior obstacle count range.
pub const MIN_OBSTACLES: i32 = 2;
/// Interior obstacle count range.
pub const MAX_OBSTACLES: i32 = 5;

/// Door size.
pub const DOOR_WIDTH: i32 = 50;
/// Door size.
pub const DOOR_HEIGHT: i32 = 20;

/// Attempts per spawn point before it is dropped.
pub const SPAWN_ATTEMPTS: u32 = 10;

/// Accepted spawn points must be strictly farther apart than this.
pub const SPAWN_MIN_DISTANCE: f64 = 100.0;

/// Boss names, picked once per boss room.
pub const BOSS_NAMES: [&str; 3] = [
    "Pesadelo da Escuridão",
    "Fúria dos Medos",
    "Espectro do Trauma",
];

// =============================================================================
// ROOM KIND
// =============================================================================

/// Room type.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[repr(u8)]
pub enum RoomKind {
    /// Regular encounter
    #[default]
    Normal = 0,
    /// Elite encounter
    Elite = 1,
    /// Boss arena
    Boss = 2,
}

/// Enemy and loot counts for a room kind.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RoomTemplate {
    /// Normal enemies
    pub enemy_count: u32,
    /// Elite enemies
    pub elite_count: u32,
    /// Amulet drops
    pub item_count: u32,
}

impl RoomKind {
    /// Population table.
    pub fn template(self) -> RoomTemplate {
        match self {
            RoomKind::Normal => RoomTemplate { enemy_count: 3, elite_count: 0, item_count: 2 },
            RoomKind::Elite => RoomTemplate { enemy_count: 2, elite_count: 2, item_count: 3 },
            RoomKind::Boss => RoomTemplate { enemy_count: 0, elite_count: 0, item_count: 4 },
        }
    }

    /// Lowercase name.
    pub fn as_str(self) -> &'static str {
        match self {
            RoomKind::Normal => "normal",
            RoomKind::Elite => "elite",
            RoomKind::Boss => "boss",
        }
    }

    /// Parse a name, falling back to `Normal` with a warning.
    pub fn parse_or_normal(name: &str) -> Self {
        name.parse().unwrap_or_else(|err: RoomKindParseError| {
            warn!("{}, using normal", err);
            RoomKind::Normal
        })
    }
}

impl fmt::Display for RoomKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unknown room name.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown room kind: {0:?}")]
pub struct RoomKindParseError(pub String);

impl FromStr for RoomKind {
    type Err = RoomKindParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "normal" => Ok(RoomKind::Normal),
            "elite" => Ok(RoomKind::Elite),
            "boss" => Ok(RoomKind::Boss),
            _ => Err(RoomKindParseError(s.to_string())),
        }
    }
}

// =============================================================================
// DESCRIPTOR
// =============================================================================

/// Walls, doors and entry/exit points.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomLayout {
    /// Perimeter tiles followed by interior obstacles
    pub walls: Vec<Rect>,
    /// Top and bottom doors
    pub doors: Vec<Rect>,
    /// Where the player enters
    pub spawn_point: Point,
    /// Where the player leaves
    pub exit_point: Point,
}

/// An enemy to instantiate.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnemyPlacement {
    /// Archetype
    pub kind: EnemyKind,
    /// Spawn position
    pub position: Point,
}

/// An amulet lying on the floor.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ItemPlacement {
    /// What it is
    pub amulet: AmuletDefinition,
    /// Where it lies
    pub position: Point,
}

/// The boss of a boss room.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BossDescriptor {
    /// Spawn position (room centre)
    pub position: Point,
    /// Display name
    pub name: String,
}

/// Everything needed to instantiate one room.
///
/// Produced once, moved to the instantiation collaborator, then discarded.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RoomDescriptor {
    /// Room type
    pub kind: RoomKind,
    /// Geometry
    pub layout: RoomLayout,
    /// Enemies (normals first, then elites)
    pub enemies: Vec<EnemyPlacement>,
    /// Amulet drops
    pub items: Vec<ItemPlacement>,
    /// Boss, only in boss rooms
    pub boss: Option<BossDescriptor>,
}

impl RoomDescriptor {
    /// Hash of the descriptor, for comparing generated rooms.
    pub fn compute_hash(&self) -> StateHash {
        let mut hasher = StateHasher::for_room();
        hasher.update_u8(self.kind as u8);

        hasher.update_u32(self.layout.walls.len() as u32);
        for wall in &self.layout.walls {
            hasher.update_i32(wall.x);
            hasher.update_i32(wall.y);
            hasher.update_i32(wall.width);
            hasher.update_i32(wall.height);
        }
        hasher.update_point(self.layout.spawn_point);
        hasher.update_point(self.layout.exit_point);

        hasher.update_u32(self.enemies.len() as u32);
        for enemy in &self.enemies {
            hasher.update_u8(enemy.kind as u8);
            hasher.update_point(enemy.position);
        }

        hasher.update_u32(self.items.len() as u32);
        for item in &self.items {
            hasher.update_u8(item.amulet.kind as u8);
            hasher.update_u32(item.amulet.value);
            hasher.update_point(item.position);
        }

        hasher.update_bool(self.boss.is_some());
        if let Some(boss) = &self.boss {
            hasher.update_point(boss.position);
            hasher.update_str(&boss.name);
        }

        hasher.finalize()
    }
}

// =============================================================================
// GENERATOR
// =============================================================================

/// Room dimensions.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoomGeneratorConfig {
    /// Room width
    pub width: i32,
    /// Room height
    pub height: i32,
}

impl Default for RoomGeneratorConfig {
    fn default() -> Self {
        Self { width: 800, height: 600 }
    }
}

/// Stateless room generator. The RNG is passed in for every call.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RoomGenerator {
    width: i32,
    height: i32,
}

impl Default for RoomGenerator {
    fn default() -> Self {
        Self::new(&RoomGeneratorConfig::default())
    }
}

impl RoomGenerator {
    /// Create a generator for a room size.
    pub fn new(config: &RoomGeneratorConfig) -> Self {
        Self {
            width: config.width,
            height: config.height,
        }
    }

    /// Room width.
    pub fn width(&self) -> i32 {
        self.width
    }

    /// Room height.
    pub fn height(&self) -> i32 {
        self.height
    }

    /// Generate a full room.
    pub fn generate(&self, rng: &mut DeterministicRng, kind: RoomKind) -> RoomDescriptor {
        let template = kind.template();

        let layout = self.generate_layout(rng);
        let enemies = self.generate_enemies(rng, template.enemy_count, template.elite_count);
        let items = self.generate_items(rng, template.item_count);
        let boss = match kind {
            RoomKind::Boss => Some(self.generate_boss(rng)),
            RoomKind::Normal | RoomKind::Elite => None,
        };

        debug!(
            kind = %kind,
            walls = layout.walls.len(),
            enemies = enemies.len(),
            items = items.len(),
            "generated room"
        );

        RoomDescriptor {
            kind,
            layout,
            enemies,
            items,
            boss,
        }
    }

    /// Generate from a type name; unknown names become `normal`.
    pub fn generate_named(&self, rng: &mut DeterministicRng, name: &str) -> RoomDescriptor {
        self.generate(rng, RoomKind::parse_or_normal(name))
    }

    /// Perimeter walls, 2-5 interior obstacles and the two doors.
    pub fn generate_layout(&self, rng: &mut DeterministicRng) -> RoomLayout {
        let (w, h) = (self.width, self.height);
        let mut walls = Vec::new();

        // Top, then bottom
        for y in [WALL_INSET, h - 60] {
            for x in (0..w.max(0)).step_by(TILE_SIZE as usize) {
                walls.push(Rect::new(x, y, TILE_SIZE, WALL_THICKNESS));
            }
        }

        // Left, then right
        let side_top = WALL_INSET + WALL_THICKNESS;
        let side_bottom = h - WALL_INSET - WALL_THICKNESS;
        for x in [WALL_INSET, w - 60] {
            for y in (side_top..side_bottom.max(side_top)).step_by(TILE_SIZE as usize) {
                walls.push(Rect::new(x, y, WALL_THICKNESS, TILE_SIZE));
            }
        }

        let obstacle_count = rng.next_int(MIN_OBSTACLES, MAX_OBSTACLES);
        for _ in 0..obstacle_count {
            let x = rng.next_int(OBSTACLE_MARGIN, w - OBSTACLE_MARGIN);
            let y = rng.next_int(OBSTACLE_MARGIN, h - OBSTACLE_MARGIN);
            let width = rng.next_int(OBSTACLE_MIN_SIZE, OBSTACLE_MAX_SIZE);
            let height = rng.next_int(OBSTACLE_MIN_SIZE, OBSTACLE_MAX_SIZE);
            walls.push(Rect::new(x, y, width, height));
        }

        let door_x = w / 2 - DOOR_WIDTH / 2;
        let doors = vec![
            Rect::new(door_x, 0, DOOR_WIDTH, DOOR_HEIGHT),
            Rect::new(door_x, h - DOOR_HEIGHT, DOOR_WIDTH, DOOR_HEIGHT),
        ];

        RoomLayout {
            walls,
            doors,
            spawn_point: Point::new(w / 2, h - 100),
            exit_point: Point::new(w / 2, 100),
        }
    }

    /// Normals first, then elites, over one shared spawn-position draw.
    ///
    /// Placements whose position was dropped are omitted.
    pub fn generate_enemies(
        &self,
        rng: &mut DeterministicRng,
        normal_count: u32,
        elite_count: u32,
    ) -> Vec<EnemyPlacement> {
        let positions = self.generate_spawn_positions(rng, normal_count + elite_count);

        let kinds = std::iter::repeat(EnemyKind::Normal)
            .take(normal_count as usize)
            .chain(std::iter::repeat(EnemyKind::Elite).take(elite_count as usize));

        kinds
            .zip(positions)
            .map(|(kind, position)| EnemyPlacement { kind, position })
            .collect()
    }

    /// Spawn positions first, then one rarity draw per requested item.
    ///
    /// The rarity draw happens `count` times even when fewer positions were
    /// found, so the draw sequence does not depend on placement success.
    pub fn generate_items(&self, rng: &mut DeterministicRng, count: u32) -> Vec<ItemPlacement> {
        let positions = self.generate_spawn_positions(rng, count);

        let mut items = Vec::with_capacity(positions.len());
        for i in 0..count as usize {
            let amulet = select_amulet_by_rarity(rng);
            if let Some(position) = positions.get(i) {
                items.push(ItemPlacement { amulet, position: *position });
            }
        }
        items
    }

    /// Boss at the room centre with a picked name.
    pub fn generate_boss(&self, rng: &mut DeterministicRng) -> BossDescriptor {
        let name = rng
            .pick(&BOSS_NAMES)
            .copied()
            .unwrap_or(BOSS_NAMES[0])
            .to_string();

        BossDescriptor {
            position: Point::new(self.width / 2, self.height / 2),
            name,
        }
    }

    /// Best-effort, mutually separated spawn points.
    ///
    /// Each point gets up to `SPAWN_ATTEMPTS` draws (x then y) to land more
    /// than `SPAWN_MIN_DISTANCE` from every accepted point; otherwise it is
    /// dropped. May return fewer than `count` points.
    pub fn generate_spawn_positions(&self, rng: &mut DeterministicRng, count: u32) -> Vec<Point> {
        let mut positions: Vec<Point> = Vec::with_capacity(count as usize);

        for _ in 0..count {
            let mut accepted = None;

            for _ in 0..SPAWN_ATTEMPTS {
                let candidate = Point::new(
                    rng.next_int(MARGIN_X, self.width - MARGIN_X),
                    rng.next_int(MARGIN_Y, self.height - MARGIN_Y),
                );

                let clear = positions
                    .iter()
                    .all(|p| p.distance(candidate) > SPAWN_MIN_DISTANCE);
                if clear {
                    accepted = Some(candidate);
                    break;
                }
            }

            match accepted {
                Some(position) => positions.push(position),
                None => debug!(placed = positions.len(), requested = count, "spawn point dropped"),
            }
        }

        if (positions.len() as u32) < count {
            warn!(placed = positions.len(), requested = count, "room too crowded for all spawn points");
        }

        positions
    }
}

// =============================================================================
// TESTS
// =============================================================================
