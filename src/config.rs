use crate::entity::{Position, ScreenPos};

/// Tunable game constants plus the grid-to-screen coordinate transform.
#[derive(Debug, Clone, Copy)]
pub struct GameConfig {
    /// Edge length N of the N x N grid.
    pub grid_size: i32,
    /// Number of flowers on the grid at any time.
    pub flower_count: usize,
    /// Score at which the game is won.
    pub win_threshold: u32,
    /// Edge length of one grid cell in pixels.
    pub cell_px: i32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            grid_size: 20,
            flower_count: 5,
            win_threshold: 20,
            cell_px: 40,
        }
    }
}

impl GameConfig {
    /// Window edge length in pixels.
    pub fn window_px(&self) -> i32 {
        self.grid_size * self.cell_px
    }

    /// Maps a grid coordinate to its screen coordinate: a pixel offset from
    /// the window centre, +y up.
    pub fn screen_pos(&self, pos: Position) -> ScreenPos {
        ScreenPos::new(
            (pos.x - self.grid_size / 2) * self.cell_px,
            (self.grid_size / 2 - pos.y) * self.cell_px,
        )
    }

    /// Screen-space bound mirroring the grid bound. Both bounds are derived
    /// from the same constants (via the transform of the two corner cells),
    /// so they agree at every grid size; the grid bound stays authoritative.
    pub fn screen_in_bounds(&self, pos: ScreenPos) -> bool {
        let min = self.screen_pos(Position::new(0, self.grid_size - 1));
        let max = self.screen_pos(Position::new(self.grid_size - 1, 0));
        pos.x >= min.x && pos.x <= max.x && pos.y >= min.y && pos.y <= max.y
    }
}
