//! Arena geometry: walls, obstacle layouts and spawn points
//!
//! Obstacles are static axis-aligned rectangles. They are read-only during a
//! round and serve both as collision and as AI cover candidates.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::consts::{ARENA_HEIGHT, ARENA_WIDTH, SPAWN_INSET};

/// A static axis-aligned rectangle
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Obstacle {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Obstacle {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    #[inline]
    pub fn min(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    #[inline]
    pub fn max(&self) -> Vec2 {
        Vec2::new(self.x + self.width, self.y + self.height)
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    #[inline]
    pub fn half_extents(&self) -> Vec2 {
        Vec2::new(self.width / 2.0, self.height / 2.0)
    }
}

/// Playable rectangle
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub left: f32,
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
}

impl Bounds {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            left: 0.0,
            top: 0.0,
            right: width,
            bottom: height,
        }
    }

    /// Keep a circle of `radius` fully inside the bounds
    pub fn clamp_circle(&self, pos: Vec2, radius: f32) -> Vec2 {
        Vec2::new(
            pos.x.clamp(self.left + radius, self.right - radius),
            pos.y.clamp(self.top + radius, self.bottom - radius),
        )
    }

    pub fn width(&self) -> f32 {
        self.right - self.left
    }

    pub fn height(&self) -> f32 {
        self.bottom - self.top
    }
}

impl Default for Bounds {
    fn default() -> Self {
        Self::new(ARENA_WIDTH, ARENA_HEIGHT)
    }
}

/// Obstacle arrangements, one picked at random per round
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Layout {
    /// Central block, four corner blocks and four side pillars
    Fortress,
    /// Four horizontal walls forming lanes, two center pillars, corner boxes
    Lanes,
    /// L-shaped covers in each quadrant and a center cross
    Maze,
}

impl Layout {
    pub const ALL: [Layout; 3] = [Layout::Fortress, Layout::Lanes, Layout::Maze];

    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self::ALL[rng.random_range(0..Self::ALL.len())]
    }

    /// Build this layout's obstacles for an arena of `w` x `h`
    pub fn obstacles(&self, w: f32, h: f32) -> Vec<Obstacle> {
        match self {
            Layout::Fortress => {
                let corner_offset = 150.0;
                let corner = 80.0;
                vec![
                    Obstacle::new(w / 2.0 - 60.0, h / 2.0 - 60.0, 120.0, 120.0),
                    Obstacle::new(corner_offset, corner_offset, corner, corner),
                    Obstacle::new(w - corner_offset - corner, corner_offset, corner, corner),
                    Obstacle::new(corner_offset, h - corner_offset - corner, corner, corner),
                    Obstacle::new(
                        w - corner_offset - corner,
                        h - corner_offset - corner,
                        corner,
                        corner,
                    ),
                    Obstacle::new(w / 2.0 - 25.0, 100.0, 50.0, 80.0),
                    Obstacle::new(w / 2.0 - 25.0, h - 180.0, 50.0, 80.0),
                    Obstacle::new(220.0, h / 2.0 - 40.0, 80.0, 80.0),
                    Obstacle::new(w - 300.0, h / 2.0 - 40.0, 80.0, 80.0),
                ]
            }
            Layout::Lanes => {
                let thick = 30.0;
                let long = 200.0;
                vec![
                    Obstacle::new(200.0, h / 3.0, long, thick),
                    Obstacle::new(w - 200.0 - long, h / 3.0, long, thick),
                    Obstacle::new(200.0, h * 2.0 / 3.0 - thick, long, thick),
                    Obstacle::new(w - 200.0 - long, h * 2.0 / 3.0 - thick, long, thick),
                    Obstacle::new(w / 2.0 - 100.0, h / 2.0 - 40.0, 60.0, 80.0),
                    Obstacle::new(w / 2.0 + 40.0, h / 2.0 - 40.0, 60.0, 80.0),
                    Obstacle::new(80.0, 80.0, 60.0, 60.0),
                    Obstacle::new(w - 140.0, 80.0, 60.0, 60.0),
                    Obstacle::new(80.0, h - 140.0, 60.0, 60.0),
                    Obstacle::new(w - 140.0, h - 140.0, 60.0, 60.0),
                ]
            }
            Layout::Maze => vec![
                Obstacle::new(200.0, 200.0, 150.0, 30.0),
                Obstacle::new(200.0, 200.0, 30.0, 150.0),
                Obstacle::new(w - 350.0, 200.0, 150.0, 30.0),
                Obstacle::new(w - 230.0, 200.0, 30.0, 150.0),
                Obstacle::new(200.0, h - 230.0, 150.0, 30.0),
                Obstacle::new(200.0, h - 350.0, 30.0, 150.0),
                Obstacle::new(w - 350.0, h - 230.0, 150.0, 30.0),
                Obstacle::new(w - 230.0, h - 350.0, 30.0, 150.0),
                Obstacle::new(w / 2.0 - 15.0, h / 2.0 - 80.0, 30.0, 160.0),
                Obstacle::new(w / 2.0 - 80.0, h / 2.0 - 15.0, 160.0, 30.0),
            ],
        }
    }
}

/// The arena for one round
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Arena {
    pub bounds: Bounds,
    pub layout: Layout,
    pub obstacles: Vec<Obstacle>,
    /// Candidate locations for power-ups
    pub spawn_points: Vec<Vec2>,
}

impl Arena {
    pub fn new(layout: Layout) -> Self {
        let bounds = Bounds::default();
        let (w, h) = (bounds.width(), bounds.height());
        Self {
            bounds,
            layout,
            obstacles: layout.obstacles(w, h),
            spawn_points: vec![
                Vec2::new(w / 2.0, 150.0),
                Vec2::new(w / 2.0, h - 150.0),
                Vec2::new(150.0, h / 2.0),
                Vec2::new(w - 150.0, h / 2.0),
                Vec2::new(w / 2.0, h / 2.0),
            ],
        }
    }

    /// An arena with walls only (handy for tests)
    pub fn open() -> Self {
        Self {
            obstacles: Vec::new(),
            ..Self::new(Layout::Fortress)
        }
    }

    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self::new(Layout::random(rng))
    }

    /// Human start position (left side)
    pub fn player_spawn(&self) -> Vec2 {
        Vec2::new(self.bounds.left + SPAWN_INSET, self.bounds.height() / 2.0)
    }

    /// AI start position (right side)
    pub fn opponent_spawn(&self) -> Vec2 {
        Vec2::new(self.bounds.right - SPAWN_INSET, self.bounds.height() / 2.0)
    }
}
