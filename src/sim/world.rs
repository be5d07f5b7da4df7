//! Tile grid and wall queries
//!
//! Positions outside the grid are treated as solid so nothing can leave the arena.

use glam::{IVec2, Vec2};
use serde::{Deserialize, Serialize};

use crate::consts::{TILE_HEIGHT, TILE_WIDTH, WORLD_HEIGHT, WORLD_WIDTH};
use crate::error::SimError;
use crate::world_to_cell;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TileKind {
    #[default]
    Empty,
    Wall,
    Water,
    Lava,
    Ice,
    Door,
    Switch,
}

impl TileKind {
    /// Only walls block movement
    pub fn is_solid(self) -> bool {
        matches!(self, TileKind::Wall)
    }
}

/// Visible play area inside the outer grid (in tiles)
const ARENA_HALF_WIDTH: i32 = 25;
const ARENA_HALF_HEIGHT: i32 = 40;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct World {
    pub width: i32,
    pub height: i32,
    tiles: Vec<TileKind>,
}

impl World {
    /// Empty grid of the given size in tiles
    pub fn new(width: i32, height: i32) -> Result<Self, SimError> {
        let len = Self::tile_count(width, height)?;
        Ok(Self { width, height, tiles: vec![TileKind::Empty; len] })
    }

    /// Number of tiles in a `width` x `height` grid, rejecting empty or
    /// overflowing sizes
    fn tile_count(width: i32, height: i32) -> Result<usize, SimError> {
        if width <= 0 || height <= 0 {
            return Err(SimError::OutOfBounds { x: width, y: height });
        }
        width
            .checked_mul(height)
            .map(|n| n as usize)
            .ok_or(SimError::OutOfBounds { x: width, y: height })
    }

    /// Check that the tile storage matches the stated size
    pub fn validate(&self) -> Result<(), SimError> {
        if Self::tile_count(self.width, self.height)? != self.tiles.len() {
            log::warn!(
                "World is {}x{} but holds {} tiles",
                self.width,
                self.height,
                self.tiles.len()
            );
            return Err(SimError::OutOfBounds { x: self.width, y: self.height });
        }
        Ok(())
    }

    /// The fixed arena: a walled rectangle around the centre with a short
    /// horizontal bar at the centre row and two vertical bars either side
    pub fn arena() -> Self {
        let mut world = Self {
            width: WORLD_WIDTH,
            height: WORLD_HEIGHT,
            tiles: vec![TileKind::Empty; (WORLD_WIDTH * WORLD_HEIGHT) as usize],
        };

        let center = world.center_cell();
        let left = center.x - ARENA_HALF_WIDTH;
        let right = center.x + ARENA_HALF_WIDTH;
        let top = center.y - ARENA_HALF_HEIGHT;
        let bottom = center.y + ARENA_HALF_HEIGHT;

        for x in left..=right {
            world.set_tile(IVec2::new(x, top), TileKind::Wall);
            world.set_tile(IVec2::new(x, bottom), TileKind::Wall);
        }
        for y in top..=bottom {
            world.set_tile(IVec2::new(left, y), TileKind::Wall);
            world.set_tile(IVec2::new(right, y), TileKind::Wall);
        }

        for x in center.x - 5..=center.x + 5 {
            world.set_tile(IVec2::new(x, center.y), TileKind::Wall);
        }
        for y in center.y - 3..=center.y + 3 {
            world.set_tile(IVec2::new(center.x + 10, y), TileKind::Wall);
            world.set_tile(IVec2::new(center.x - 10, y), TileKind::Wall);
        }

        log::info!(
            "Arena built: {}x{} tiles, play area x {}..={} y {}..={}",
            world.width,
            world.height,
            left,
            right,
            top,
            bottom
        );
        world
    }

    #[inline]
    fn index(&self, cell: IVec2) -> Option<usize> {
        if self.in_bounds(cell) {
            Some((cell.y * self.width + cell.x) as usize)
        } else {
            None
        }
    }

    #[inline]
    pub fn in_bounds(&self, cell: IVec2) -> bool {
        cell.x >= 0 && cell.y >= 0 && cell.x < self.width && cell.y < self.height
    }

    pub fn tile(&self, cell: IVec2) -> Option<TileKind> {
        self.index(cell).map(|i| self.tiles[i])
    }

    /// Write a tile; out-of-bounds writes are ignored
    pub fn set_tile(&mut self, cell: IVec2, kind: TileKind) {
        match self.index(cell) {
            Some(i) => self.tiles[i] = kind,
            None => log::warn!("Ignoring tile write outside the world at ({}, {})", cell.x, cell.y),
        }
    }

    /// Checked variant of [`World::set_tile`]
    pub fn try_set_tile(&mut self, cell: IVec2, kind: TileKind) -> Result<(), SimError> {
        let i = self.index(cell).ok_or(SimError::OutOfBounds { x: cell.x, y: cell.y })?;
        self.tiles[i] = kind;
        Ok(())
    }

    /// Solid test for a grid cell (fail-closed)
    pub fn is_wall_cell(&self, cell: IVec2) -> bool {
        self.tile(cell).is_none_or(TileKind::is_solid)
    }

    /// Solid test for a world position (fail-closed)
    pub fn is_wall_at(&self, pos: Vec2) -> bool {
        self.is_wall_cell(world_to_cell(pos))
    }

    pub fn center_cell(&self) -> IVec2 {
        IVec2::new(self.width / 2, self.height / 2)
    }

    /// Centre of the grid in world units
    pub fn center(&self) -> Vec2 {
        Vec2::new(
            self.width as f32 * TILE_WIDTH / 2.0,
            self.height as f32 * TILE_HEIGHT / 2.0,
        )
    }

    /// Total size in world units
    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width as f32 * TILE_WIDTH, self.height as f32 * TILE_HEIGHT)
    }
}
