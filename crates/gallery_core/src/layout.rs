//! Placeholder geometry of the thumbnail grid

use crate::GalleryTuning;

/// Vertical range in scroll coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub top: f32,
    pub bottom: f32,
}

impl Viewport {
    pub fn new(top: f32, bottom: f32) -> Self {
        Self { top, bottom }
    }

    /// Grow the range by `margin` on both ends
    pub fn expand(self, margin: f32) -> Self {
        Self {
            top: self.top - margin,
            bottom: self.bottom + margin,
        }
    }

    /// Strict overlap test
    pub fn intersects(&self, extent: Extent) -> bool {
        extent.top < self.bottom && extent.bottom > self.top
    }
}

/// Vertical extent of one placeholder
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Extent {
    pub top: f32,
    pub bottom: f32,
}

/// Row-major grid of square cells
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridLayout {
    pub columns: usize,
    pub cell_size: f32,
    pub gap: f32,
}

impl Default for GridLayout {
    fn default() -> Self {
        Self {
            columns: 4,
            cell_size: 180.0,
            gap: 0.0,
        }
    }
}

impl GridLayout {
    pub fn new(columns: usize, cell_size: f32, gap: f32) -> Self {
        Self {
            columns: columns.max(1),
            cell_size,
            gap,
        }
    }

    pub fn from_tuning(tuning: &GalleryTuning) -> Self {
        Self::new(tuning.grid_columns, tuning.thumbnail_size, tuning.grid_gap)
    }

    pub fn row_of(&self, index: usize) -> usize {
        index / self.columns.max(1)
    }

    pub fn row_pitch(&self) -> f32 {
        self.cell_size + self.gap
    }

    pub fn item_extent(&self, index: usize) -> Extent {
        let top = self.row_of(index) as f32 * self.row_pitch();
        Extent {
            top,
            bottom: top + self.cell_size,
        }
    }

    /// Total scroll height for `count` items
    pub fn content_height(&self, count: usize) -> f32 {
        if count == 0 {
            return 0.0;
        }
        let rows = self.row_of(count - 1) + 1;
        rows as f32 * self.row_pitch() - self.gap
    }

    /// Indices whose placeholder intersects `range`
    pub fn items_in(&self, range: Viewport, count: usize) -> Vec<usize> {
        (0..count)
            .filter(|&i| range.intersects(self.item_extent(i)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_item_extent() {
        let grid = GridLayout::new(4, 180.0, 10.0);
        assert_eq!(grid.item_extent(0), Extent { top: 0.0, bottom: 180.0 });
        assert_eq!(grid.item_extent(3), Extent { top: 0.0, bottom: 180.0 });
        assert_eq!(grid.item_extent(4), Extent { top: 190.0, bottom: 370.0 });
        assert_eq!(grid.content_height(5), 370.0);
        assert_eq!(grid.content_height(0), 0.0);
    }

    #[test]
    fn test_zero_columns_clamped() {
        let grid = GridLayout::new(0, 100.0, 0.0);
        assert_eq!(grid.columns, 1);
        assert_eq!(grid.item_extent(2).top, 200.0);
    }

    #[test]
    fn test_items_in_expanded_range() {
        let grid = GridLayout::new(2, 180.0, 0.0);
        // rows: 0-180, 180-360, 360-540, 540-720
        let visible = grid.items_in(Viewport::new(0.0, 180.0), 8);
        assert_eq!(visible, vec![0, 1]);

        let near = grid.items_in(Viewport::new(0.0, 180.0).expand(360.0), 8);
        assert_eq!(near, vec![0, 1, 2, 3, 4, 5]);
    }
}
