use std::{
    collections::{HashSet, VecDeque},
    ops::{Deref, DerefMut},
};

use rand::Rng;

pub const GRID_SIZE: usize = 10;
pub const HEART_COUNT: usize = 15;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum TileContent {
    Heart,
    Near(u8),
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum TileMode {
    Hidden,
    Flagged,
    Revealed,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Tile {
    pub mode: TileMode,
    pub content: TileContent,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Tiles(Vec<Vec<Tile>>);

impl Deref for Tiles {
    type Target = Vec<Vec<Tile>>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl DerefMut for Tiles {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Phase {
    Playing,
    Won,
    Lost,
}

pub struct Game {
    tiles: Tiles,
    phase: Phase,
    hearts_placed: bool,
    hearts_found: usize,
    size: usize,
    heart_count: usize,
}

impl Game {
    pub fn new(size: usize, heart_count: usize) -> Self {
        assert!(size > 0, "board should have at least one cell");
        assert!(
            heart_count < size * size,
            "should at most place `size*size - 1` # of hearts"
        );
        Self {
            tiles: Tiles::new_blank(size),
            phase: Phase::Playing,
            hearts_placed: false,
            hearts_found: 0,
            size,
            heart_count,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn hearts_remaining(&self) -> usize {
        self.heart_count - self.hearts_found
    }

    pub fn tile_at(&self, row: usize, col: usize) -> &Tile {
        &self.tiles[row][col]
    }

    pub fn reveal(&mut self, row: usize, col: usize) {
        if self.phase != Phase::Playing {
            return;
        }
        let TileMode::Hidden = self.tiles[row][col].mode else {
            return;
        };

        // Hearts go down on the first reveal, never on this cell, so the
        // first click is always safe.
        if !self.hearts_placed {
            self.tiles.place_hearts(self.heart_count, (row, col));
            self.tiles.count_neighbours();
            self.hearts_placed = true;
        }

        self.tiles[row][col].mode = TileMode::Revealed;
        match self.tiles[row][col].content {
            TileContent::Heart => {
                self.tiles.reveal_hearts();
                self.phase = Phase::Lost;
                return;
            }
            TileContent::Near(0) => self.tiles.flood_reveal(row, col),
            TileContent::Near(_) => {}
        }

        if self.tiles.revealed_safe_count() == self.size * self.size - self.heart_count {
            self.phase = Phase::Won;
        }
    }

    pub fn toggle_flag(&mut self, row: usize, col: usize) {
        if self.phase != Phase::Playing {
            return;
        }
        let tile = &mut self.tiles[row][col];
        tile.mode = match tile.mode {
            TileMode::Hidden => TileMode::Flagged,
            TileMode::Flagged => TileMode::Hidden,
            TileMode::Revealed => return,
        };
        self.hearts_found = self.tiles.flagged_heart_count();
    }
}

impl Tiles {
    fn new_blank(size: usize) -> Tiles {
        Tiles(Vec::from_iter((0..size).map(|_| {
            Vec::from_iter((0..size).map(|_| Tile {
                mode: TileMode::Hidden,
                content: TileContent::Near(0),
            }))
        })))
    }

    fn neighbours(&self, row: usize, col: usize) -> Vec<(usize, usize)> {
        let size = self.len();
        (-1..=1)
            .flat_map(|row_offset| (-1..=1).map(move |col_offset| (row_offset, col_offset)))
            .filter(|&offsets| offsets != (0, 0))
            .filter_map(|(row_offset, col_offset): (isize, isize)| {
                let row = row.checked_add_signed(row_offset)?;
                let col = col.checked_add_signed(col_offset)?;
                (row < size && col < size).then_some((row, col))
            })
            .collect()
    }

    fn place_hearts(&mut self, heart_count: usize, ignore: (usize, usize)) {
        let mut rng = rand::rng();
        for _ in 0..heart_count {
            loop {
                let row = rng.random_range(0..self.len());
                let col = rng.random_range(0..self.len());
                if (row, col) == ignore {
                    continue;
                }
                if matches!(self[row][col].content, TileContent::Heart) {
                    continue;
                }
                self[row][col].content = TileContent::Heart;
                break;
            }
        }
    }

    fn count_neighbours(&mut self) {
        for row in 0..self.len() {
            for col in 0..self.len() {
                if matches!(self[row][col].content, TileContent::Heart) {
                    continue;
                }
                let hearts = self
                    .neighbours(row, col)
                    .iter()
                    .filter(|&&(row, col)| matches!(self[row][col].content, TileContent::Heart))
                    .count();
                self[row][col].content = TileContent::Near(hearts as u8);
            }
        }
    }

    // Breadth-first over the zero-count region: flagged tiles block the
    // expansion, every tile enters the queue at most once.
    fn flood_reveal(&mut self, row: usize, col: usize) {
        let mut queue = VecDeque::from([(row, col)]);
        let mut visited = HashSet::new();
        while let Some(pos) = queue.pop_front() {
            if !visited.insert(pos) {
                continue;
            }
            for (row, col) in self.neighbours(pos.0, pos.1) {
                let tile = &mut self[row][col];
                if !matches!(tile.mode, TileMode::Hidden) {
                    continue;
                }
                if matches!(tile.content, TileContent::Heart) {
                    continue;
                }
                tile.mode = TileMode::Revealed;
                if matches!(tile.content, TileContent::Near(0)) {
                    queue.push_back((row, col));
                }
            }
        }
    }

    fn reveal_hearts(&mut self) {
        for tile in self.iter_mut().flatten() {
            if matches!(tile.content, TileContent::Heart) {
                tile.mode = TileMode::Revealed;
            }
        }
    }

    fn revealed_safe_count(&self) -> usize {
        self.iter()
            .flatten()
            .filter(|tile| {
                matches!(tile.mode, TileMode::Revealed)
                    && !matches!(tile.content, TileContent::Heart)
            })
            .count()
    }

    fn flagged_heart_count(&self) -> usize {
        self.iter()
            .flatten()
            .filter(|tile| {
                matches!(tile.mode, TileMode::Flagged)
                    && matches!(tile.content, TileContent::Heart)
            })
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_hearts(size: usize, hearts: &[(usize, usize)]) -> Game {
        let mut game = Game::new(size, hearts.len());
        for &(row, col) in hearts {
            game.tiles[row][col].content = TileContent::Heart;
        }
        game.tiles.count_neighbours();
        game.hearts_placed = true;
        game
    }

    fn heart_count(game: &Game) -> usize {
        game.tiles
            .iter()
            .flatten()
            .filter(|tile| matches!(tile.content, TileContent::Heart))
            .count()
    }

    #[test]
    fn first_reveal_never_hits_a_heart() {
        for row in 0..GRID_SIZE {
            for col in 0..GRID_SIZE {
                let mut game = Game::new(GRID_SIZE, HEART_COUNT);
                game.reveal(row, col);
                assert_ne!(game.phase(), Phase::Lost);
                assert_eq!(game.tile_at(row, col).mode, TileMode::Revealed);
                assert_ne!(game.tile_at(row, col).content, TileContent::Heart);
            }
        }
    }

    #[test]
    fn placement_puts_down_exactly_the_heart_quota() {
        let mut game = Game::new(GRID_SIZE, HEART_COUNT);
        game.reveal(4, 4);
        assert_eq!(heart_count(&game), HEART_COUNT);
    }

    #[test]
    fn neighbour_counts_match_hand_computation() {
        let game = with_hearts(3, &[(0, 0), (2, 2)]);
        assert_eq!(game.tile_at(1, 1).content, TileContent::Near(2));
        assert_eq!(game.tile_at(0, 1).content, TileContent::Near(1));
        assert_eq!(game.tile_at(1, 2).content, TileContent::Near(1));
        assert_eq!(game.tile_at(0, 2).content, TileContent::Near(0));
    }

    #[test]
    fn flood_reveal_opens_the_connected_zero_region_and_its_border() {
        // A full column of hearts splits the board; the flood stays on
        // the clicked side.
        let wall: Vec<_> = (0..5).map(|row| (row, 2)).collect();
        let mut game = with_hearts(5, &wall);
        game.reveal(0, 0);
        for row in 0..5 {
            assert_eq!(game.tile_at(row, 0).mode, TileMode::Revealed);
            assert_eq!(game.tile_at(row, 1).mode, TileMode::Revealed);
            assert_eq!(game.tile_at(row, 2).mode, TileMode::Hidden);
            assert_eq!(game.tile_at(row, 3).mode, TileMode::Hidden);
            assert_eq!(game.tile_at(row, 4).mode, TileMode::Hidden);
        }
        assert_eq!(game.phase(), Phase::Playing);
    }

    #[test]
    fn flood_reveal_of_every_safe_tile_wins() {
        let mut game = with_hearts(3, &[(2, 2)]);
        game.reveal(0, 0);
        assert_eq!(game.phase(), Phase::Won);
        assert_eq!(game.tile_at(1, 1).mode, TileMode::Revealed);
        assert_eq!(game.tile_at(2, 2).mode, TileMode::Hidden);
    }

    #[test]
    fn flagged_tile_blocks_the_flood() {
        let mut game = with_hearts(3, &[(2, 2)]);
        game.toggle_flag(0, 1);
        game.reveal(0, 0);
        assert_eq!(game.tile_at(0, 1).mode, TileMode::Flagged);
        // (0, 2) is only reachable through the flagged zero tile.
        assert_eq!(game.tile_at(0, 2).mode, TileMode::Hidden);
        assert_eq!(game.phase(), Phase::Playing);
    }

    #[test]
    fn win_requires_every_safe_tile_and_nothing_less() {
        let mut game = with_hearts(2, &[(0, 0)]);
        game.reveal(1, 1);
        assert_eq!(game.phase(), Phase::Playing);
        game.reveal(0, 1);
        assert_eq!(game.phase(), Phase::Playing);
        game.reveal(1, 0);
        assert_eq!(game.phase(), Phase::Won);
    }

    #[test]
    fn tripped_heart_reveals_every_heart_and_nothing_else() {
        let mut game = with_hearts(3, &[(0, 0), (2, 2)]);
        game.reveal(1, 1);
        game.reveal(0, 0);
        assert_eq!(game.phase(), Phase::Lost);
        assert_eq!(game.tile_at(0, 0).mode, TileMode::Revealed);
        assert_eq!(game.tile_at(2, 2).mode, TileMode::Revealed);
        assert_eq!(game.tile_at(1, 1).mode, TileMode::Revealed);
        assert_eq!(game.tile_at(0, 1).mode, TileMode::Hidden);
    }

    #[test]
    fn repeated_reveal_is_a_no_op() {
        let mut game = with_hearts(3, &[(0, 0)]);
        game.reveal(1, 1);
        let tiles = game.tiles.clone();
        let phase = game.phase();
        game.reveal(1, 1);
        assert_eq!(game.tiles, tiles);
        assert_eq!(game.phase(), phase);
    }

    #[test]
    fn reveal_on_a_flagged_tile_is_a_no_op() {
        let mut game = with_hearts(3, &[(0, 0)]);
        game.toggle_flag(0, 0);
        game.reveal(0, 0);
        assert_eq!(game.tile_at(0, 0).mode, TileMode::Flagged);
        assert_eq!(game.phase(), Phase::Playing);
    }

    #[test]
    fn flag_on_a_revealed_tile_is_a_no_op() {
        let mut game = with_hearts(3, &[(0, 0)]);
        game.reveal(2, 2);
        game.toggle_flag(2, 2);
        assert_eq!(game.tile_at(2, 2).mode, TileMode::Revealed);
    }

    #[test]
    fn finished_game_ignores_reveal_and_flag() {
        let mut game = with_hearts(2, &[(0, 0)]);
        game.reveal(0, 0);
        assert_eq!(game.phase(), Phase::Lost);
        let tiles = game.tiles.clone();
        game.reveal(1, 1);
        game.toggle_flag(1, 0);
        assert_eq!(game.tiles, tiles);
        assert_eq!(game.phase(), Phase::Lost);
    }

    #[test]
    fn hearts_remaining_tracks_flagged_hearts_only() {
        let mut game = with_hearts(3, &[(0, 0), (2, 2)]);
        assert_eq!(game.hearts_remaining(), 2);
        game.toggle_flag(0, 0);
        assert_eq!(game.hearts_remaining(), 1);
        game.toggle_flag(1, 1);
        assert_eq!(game.hearts_remaining(), 1);
        game.toggle_flag(0, 0);
        assert_eq!(game.hearts_remaining(), 2);
    }

    #[test]
    #[should_panic]
    fn heart_quota_must_leave_a_safe_tile() {
        Game::new(2, 4);
    }
}
