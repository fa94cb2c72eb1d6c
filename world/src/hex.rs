//! Offset hex grid that positions path and turret tiles in world space.

use tempo_defence_core::{HexCell, WorldPoint};

/// Axis along which alternating rows are shifted.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OffsetAxis {
    /// Odd rows shift horizontally.
    #[default]
    X,
    /// Odd columns shift vertically.
    Y,
}

/// Spacing rules that map hex tiles onto world positions.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HexLayout {
    tile_offset_x: f32,
    tile_offset_y: f32,
    offset_axis: OffsetAxis,
    off_row_offset: f32,
}

impl HexLayout {
    /// Creates a layout from per-axis tile spacing and the off-row shift.
    #[must_use]
    pub const fn new(
        tile_offset_x: f32,
        tile_offset_y: f32,
        offset_axis: OffsetAxis,
        off_row_offset: f32,
    ) -> Self {
        Self {
            tile_offset_x,
            tile_offset_y,
            offset_axis,
            off_row_offset,
        }
    }

    /// World position of the tile's centre.
    #[must_use]
    pub fn position(&self, cell: HexCell) -> WorldPoint {
        let mut x = cell.column() as f32 * self.tile_offset_x;
        let mut y = cell.row() as f32 * self.tile_offset_y;
        match self.offset_axis {
            OffsetAxis::X if cell.row() % 2 == 1 => x += self.off_row_offset,
            OffsetAxis::Y if cell.column() % 2 == 1 => y += self.off_row_offset,
            _ => {}
        }
        WorldPoint::new(x, y)
    }
}

impl Default for HexLayout {
    fn default() -> Self {
        Self::new(1.0, 0.75, OffsetAxis::X, 0.5)
    }
}

/// Role a tile plays on the map.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TileState {
    /// Decorative tile; nothing may be built or walked.
    #[default]
    Blocked,
    /// Tile belongs to the enemy path.
    Path,
    /// Tile accepts a tower.
    TurretSpawn,
}

/// Dense grid of hex tiles.
#[derive(Clone, Debug)]
pub struct HexGrid {
    columns: u32,
    rows: u32,
    layout: HexLayout,
    tiles: Vec<TileState>,
}

impl HexGrid {
    /// Creates a grid where every tile starts [`TileState::Blocked`].
    #[must_use]
    pub fn new(columns: u32, rows: u32, layout: HexLayout) -> Self {
        let capacity = usize::try_from(u64::from(columns) * u64::from(rows)).unwrap_or(0);
        Self {
            columns,
            rows,
            layout,
            tiles: vec![TileState::Blocked; capacity],
        }
    }

    /// Grid dimensions as `(columns, rows)`.
    #[must_use]
    pub const fn dimensions(&self) -> (u32, u32) {
        (self.columns, self.rows)
    }

    /// Layout used to position tiles.
    #[must_use]
    pub const fn layout(&self) -> &HexLayout {
        &self.layout
    }

    /// Reports whether the cell lies inside the grid.
    #[must_use]
    pub fn contains(&self, cell: HexCell) -> bool {
        self.index(cell).is_some()
    }

    /// Role of the tile, or `None` outside the grid.
    #[must_use]
    pub fn state(&self, cell: HexCell) -> Option<TileState> {
        self.index(cell).map(|index| self.tiles[index])
    }

    /// Assigns a role to the tile. Returns `false` outside the grid.
    pub fn set_state(&mut self, cell: HexCell, state: TileState) -> bool {
        match self.index(cell) {
            Some(index) => {
                self.tiles[index] = state;
                true
            }
            None => false,
        }
    }

    /// World position of the tile, or `None` outside the grid.
    #[must_use]
    pub fn tile_position(&self, cell: HexCell) -> Option<WorldPoint> {
        self.contains(cell).then(|| self.layout.position(cell))
    }

    /// Tile closest to the centre of the grid.
    #[must_use]
    pub const fn middle_tile(&self) -> HexCell {
        HexCell::new(self.columns / 2, self.rows / 2)
    }

    /// Every tile that accepts a tower, column by column.
    #[must_use]
    pub fn turret_spawnpoints(&self) -> Vec<HexCell> {
        let mut spawnpoints = Vec::new();
        for column in 0..self.columns {
            for row in 0..self.rows {
                let cell = HexCell::new(column, row);
                if self.state(cell) == Some(TileState::TurretSpawn) {
                    spawnpoints.push(cell);
                }
            }
        }
        spawnpoints
    }

    /// Resets every tile to [`TileState::Blocked`].
    pub fn clear(&mut self) {
        self.tiles.fill(TileState::Blocked);
    }

    fn index(&self, cell: HexCell) -> Option<usize> {
        if cell.column() < self.columns && cell.row() < self.rows {
            let row = usize::try_from(cell.row()).ok()?;
            let column = usize::try_from(cell.column()).ok()?;
            let width = usize::try_from(self.columns).ok()?;
            Some(row * width + column)
        } else {
            None
        }
    }
}
