//! Game configuration
//!
//! Every element of the scene is described by a plain data bundle. Missing
//! fields fall back to zero or a fixed default, never to an error: a broken
//! table produces a wrong-looking scene, not a crash.

use std::collections::BTreeMap;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Which constructor a background element resolves to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ElementKind {
    /// Full-width tiling layer
    Scroller,
    /// Stream of randomly spaced sprites
    #[default]
    Sprites,
    /// Paired top/bottom obstacles
    Obstacles,
    /// Fading particles anchored to a moving entity
    Particles,
}

/// 2D offset, both axes default to 0
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

/// Velocity per elapsed unit; axes are optional so defaults can differ per axis
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct SpeedConfig {
    pub x: Option<f32>,
    pub y: Option<f32>,
}

/// Spacing between emitted sprites: `{min, max}` or a single scalar
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Spacing {
    Fixed(f32),
    Range {
        #[serde(default)]
        min: f32,
        #[serde(default)]
        max: f32,
    },
}

impl Spacing {
    /// (minimum, extra range) pair
    pub fn bounds(&self) -> (f32, f32) {
        match *self {
            Spacing::Fixed(v) => (v, 0.0),
            Spacing::Range { min, max } => (min, max),
        }
    }
}

/// Parameter bundle for one scene element
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default, rename_all = "camelCase")]
pub struct EmitterConfig {
    #[serde(rename = "type")]
    pub kind: ElementKind,
    /// Single texture (scrollers)
    pub texture: Option<String>,
    /// Texture pool to pick from (emitters)
    pub textures: Vec<String>,
    pub position: Point,
    pub speed: SpeedConfig,
    pub spacing: Option<Spacing>,
    pub random_flip: Option<bool>,
    /// Children take part in player collision tests
    pub collidable: bool,
    /// Vertical clearance between obstacle halves
    pub gap: f32,
    /// Obstacles passing this x score a point
    pub score_x: f32,
    /// Particle scale factor
    pub scale: Option<f32>,
    /// Particle emission interval
    pub time: f32,
    /// Particle lifetime in alpha steps
    pub steps: u32,
    pub max_particles: usize,
}

impl EmitterConfig {
    pub fn velocity(&self) -> Vec2 {
        Vec2::new(
            self.speed.x.unwrap_or(DEFAULT_SPEED_X),
            self.speed.y.unwrap_or(0.0),
        )
    }

    pub fn offset(&self) -> Vec2 {
        Vec2::new(self.position.x, self.position.y)
    }

    /// (minimum spacing, extra random range)
    pub fn spacing_bounds(&self) -> (f32, f32) {
        self.spacing.map(|s| s.bounds()).unwrap_or((0.0, 0.0))
    }

    pub fn random_flip(&self) -> bool {
        self.random_flip.unwrap_or(true)
    }

    pub fn scale(&self) -> f32 {
        self.scale.unwrap_or(1.0)
    }

    fn scroller(texture: &str, y: f32, speed_x: f32) -> Self {
        Self {
            kind: ElementKind::Scroller,
            texture: Some(texture.to_string()),
            position: Point { x: 0.0, y },
            speed: SpeedConfig {
                x: Some(speed_x),
                y: None,
            },
            ..Default::default()
        }
    }

    fn sprites(textures: &[&str], y: f32, speed_x: f32, min: f32, max: f32) -> Self {
        Self {
            kind: ElementKind::Sprites,
            textures: textures.iter().map(|t| t.to_string()).collect(),
            position: Point { x: 0.0, y },
            speed: SpeedConfig {
                x: Some(speed_x),
                y: None,
            },
            spacing: Some(Spacing::Range { min, max }),
            ..Default::default()
        }
    }

    fn particles(textures: &[&str], speed: (f32, f32), scale: f32) -> Self {
        Self {
            kind: ElementKind::Particles,
            textures: textures.iter().map(|t| t.to_string()).collect(),
            speed: SpeedConfig {
                x: Some(speed.0),
                y: Some(speed.1),
            },
            scale: Some(scale),
            time: 10.0,
            steps: 100,
            max_particles: 60,
            ..Default::default()
        }
    }
}

/// Fixed screen dimensions; 0 means "take it from the window"
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScreenConfig {
    pub width: f32,
    pub height: f32,
}

impl Default for ScreenConfig {
    fn default() -> Self {
        Self {
            width: 0.0,
            height: 720.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EntranceTuning {
    /// Pitch while gliding in (degrees)
    pub angle: f32,
    /// Horizontal glide speed
    pub speed: f32,
}

impl Default for EntranceTuning {
    fn default() -> Self {
        Self {
            angle: 30.0,
            speed: 1.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FallingTuning {
    /// Added to the velocity accumulator every frame
    pub gravity_step: f32,
    /// Velocity above which the nose starts dropping
    pub gravity_max: f32,
    pub angle_step: f32,
    pub angle_max: f32,
}

impl Default for FallingTuning {
    fn default() -> Self {
        Self {
            gravity_step: 0.5,
            gravity_max: 3.0,
            angle_step: 3.0,
            angle_max: 180.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlyingTuning {
    /// Pitch set by a flap (degrees)
    pub angle: f32,
    /// Velocity set by a flap (negative is up)
    pub gravity: f32,
}

impl Default for FlyingTuning {
    fn default() -> Self {
        Self {
            angle: 30.0,
            gravity: -9.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CrashTuning {
    /// Gravity step while tumbling through the air
    pub fall_gravity: f32,
    /// Forward tumble speed while airborne
    pub fall_speed: f32,
    /// Resting offset below the floor threshold
    pub ground_offset: f32,
    /// Per-frame slide deceleration once grounded
    pub decelerate: f32,
    pub angle_step: f32,
    pub angle_max: f32,
}

impl Default for CrashTuning {
    fn default() -> Self {
        Self {
            fall_gravity: 0.5,
            fall_speed: 3.0,
            ground_offset: 10.0,
            decelerate: 1.0,
            angle_step: 1.0,
            angle_max: 120.0,
        }
    }
}

/// Player hitbox, physics tuning and trailing particles
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PlayerConfig {
    /// Hitbox size, centered on the player position
    pub size: Vec2,
    /// Collision corner inset, also added to the floor threshold
    pub collision_margin: f32,
    pub entrance: EntranceTuning,
    pub falling: FallingTuning,
    pub flying: FlyingTuning,
    pub crashing: CrashTuning,
    pub stars: EmitterConfig,
    pub smoke: EmitterConfig,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            size: Vec2::new(110.0, 90.0),
            collision_margin: 30.0,
            entrance: EntranceTuning::default(),
            falling: FallingTuning::default(),
            flying: FlyingTuning::default(),
            crashing: CrashTuning::default(),
            stars: EmitterConfig::particles(
                &["star_01.png", "star_04.png", "star_07.png"],
                (-1.0, -0.25),
                0.1,
            ),
            smoke: EmitterConfig::particles(
                &[
                    "smoke_01.png",
                    "smoke_02.png",
                    "smoke_04.png",
                    "smoke_05.png",
                    "smoke_07.png",
                    "smoke_08.png",
                ],
                (-1.5, 0.25),
                0.25,
            ),
        }
    }
}

/// Pre-play countdown
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CountdownConfig {
    pub start_value: i32,
    /// Elapsed units between steps
    pub step_time: f32,
}

impl Default for CountdownConfig {
    fn default() -> Self {
        Self {
            start_value: COUNTDOWN_START,
            step_time: COUNTDOWN_STEP,
        }
    }
}

/// Complete game configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GameConfig {
    pub screen: ScreenConfig,
    pub player: PlayerConfig,
    pub countdown: CountdownConfig,
    /// Background element whose y marks the floor
    pub floor_element: String,
    /// Scene elements keyed by name
    pub background: BTreeMap<String, EmitterConfig>,
}

impl Default for GameConfig {
    fn default() -> Self {
        let mut background = BTreeMap::new();
        background.insert(
            "bg".to_string(),
            EmitterConfig::scroller("05_far_BG.jpg", 0.0, -1.0),
        );
        background.insert(
            "silhouette".to_string(),
            EmitterConfig::scroller("03_rear_silhouette.png", 350.0, -1.25),
        );
        background.insert(
            "rear_canopy".to_string(),
            EmitterConfig::scroller("03_rear_canopy.png", 30.0, -1.5),
        );
        background.insert(
            "trees".to_string(),
            EmitterConfig::sprites(&["02_tree_1.png", "02_tree_2.png"], 20.0, -2.0, 100.0, 200.0),
        );
        background.insert(
            "lava".to_string(),
            EmitterConfig::scroller("01_front_silhouette.png", 390.0, -2.5),
        );
        background.insert(
            "canopy".to_string(),
            EmitterConfig::scroller("02_front_canopy.png", 30.0, -2.0),
        );
        background.insert(
            "flowers".to_string(),
            EmitterConfig::sprites(
                &[
                    "01_hanging_flower1.png",
                    "01_hanging_flower2.png",
                    "01_hanging_flower3.png",
                ],
                0.0,
                -2.25,
                50.0,
                250.0,
            ),
        );
        background.insert(
            "columns".to_string(),
            EmitterConfig {
                kind: ElementKind::Obstacles,
                collidable: true,
                textures: vec!["column.png".to_string()],
                speed: SpeedConfig {
                    x: Some(-2.75),
                    y: None,
                },
                spacing: Some(Spacing::Fixed(300.0)),
                gap: 200.0,
                score_x: 0.0,
                ..Default::default()
            },
        );
        background.insert(
            "floor".to_string(),
            EmitterConfig::scroller("00_forest_floor.png", 562.0, -3.0),
        );
        background.insert(
            "leaves".to_string(),
            EmitterConfig::scroller("00_roof_leaves.png", 0.0, -3.5),
        );

        Self {
            screen: ScreenConfig::default(),
            player: PlayerConfig::default(),
            countdown: CountdownConfig::default(),
            floor_element: "floor".to_string(),
            background,
        }
    }
}

impl GameConfig {
    /// Parse from JSON; absent fields keep their defaults
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        log::info!(
            "Loaded game config with {} background elements",
            config.background.len()
        );
        Ok(config)
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
