use crate::error::OverlayError;
use image::RgbaImage;

/// Side length of a full grid cell in source pixels.
pub const CHUNK_SIZE: u32 = 32;

/// One grid cell of the source image. Edge cells keep their cropped size
/// instead of being padded, so `width`/`height` are at most [`CHUNK_SIZE`].
#[derive(Debug, Clone, PartialEq)]
pub struct Chunk {
    pub row: u32,
    pub col: u32,
    pub pixels: RgbaImage,
}

impl Chunk {
    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }
}

/// The full chunk table for one decoded image. Immutable after `build`;
/// navigation and calibration both rely on the linear index
/// `i = row * cols + col` staying stable for the life of the image.
#[derive(Debug, Clone, PartialEq)]
pub struct ChunkGrid {
    cols: u32,
    rows: u32,
    chunks: Vec<Chunk>,
}

impl ChunkGrid {
    /// Split a decoded image into the grid. Deterministic for identical
    /// input; fails only on a zero-dimension image.
    pub fn build(image: &RgbaImage) -> Result<Self, OverlayError> {
        let (width, height) = image.dimensions();
        if width == 0 || height == 0 {
            return Err(OverlayError::InvalidImage);
        }

        let cols = width.div_ceil(CHUNK_SIZE);
        let rows = height.div_ceil(CHUNK_SIZE);

        let mut chunks = Vec::with_capacity((cols * rows) as usize);
        for row in 0..rows {
            for col in 0..cols {
                let x = col * CHUNK_SIZE;
                let y = row * CHUNK_SIZE;
                let w = CHUNK_SIZE.min(width - x);
                let h = CHUNK_SIZE.min(height - y);
                let pixels = image::imageops::crop_imm(image, x, y, w, h).to_image();
                chunks.push(Chunk { row, col, pixels });
            }
        }

        Ok(Self { cols, rows, chunks })
    }

    pub fn cols(&self) -> u32 {
        self.cols
    }

    pub fn rows(&self) -> u32 {
        self.rows
    }

    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Chunk> {
        self.chunks.get(index)
    }

    pub fn index_of(&self, row: u32, col: u32) -> usize {
        (row * self.cols + col) as usize
    }

    pub fn chunks(&self) -> impl Iterator<Item = &Chunk> {
        self.chunks.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_chunk_for_tiny_image() {
        let img = RgbaImage::new(5, 7);
        let grid = ChunkGrid::build(&img).expect("grid should build");
        assert_eq!(grid.cols(), 1);
        assert_eq!(grid.rows(), 1);
        assert_eq!(grid.len(), 1);
        let chunk = grid.get(0).expect("chunk 0 exists");
        assert_eq!((chunk.width(), chunk.height()), (5, 7));
    }

    #[test]
    fn exact_multiple_has_no_partial_cells() {
        let img = RgbaImage::new(64, 32);
        let grid = ChunkGrid::build(&img).expect("grid should build");
        assert_eq!((grid.cols(), grid.rows()), (2, 1));
        for chunk in grid.chunks() {
            assert_eq!((chunk.width(), chunk.height()), (CHUNK_SIZE, CHUNK_SIZE));
        }
    }

    #[test]
    fn linear_index_matches_row_major_order() {
        let img = RgbaImage::new(100, 70);
        let grid = ChunkGrid::build(&img).expect("grid should build");
        for (i, chunk) in grid.chunks().enumerate() {
            assert_eq!(grid.index_of(chunk.row, chunk.col), i);
        }
    }
}
