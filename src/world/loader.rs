//! Text level-file parser.
//!
//! A level file has up to three sections, each bracketed by marker lines:
//!
//! ```text
//! MAP
//! 1111111111
//! 1000P00001
//! 1111111111
//! END_MAP
//! ENEMIES
//! imp, 5, 5
//! END_ENEMIES
//! ITEMS
//! health, 2, 2
//! END_ITEMS
//! ```
//!
//! Map rows use `0`–`3` for materials, `P` for the player start and
//! `E`/`I` as floor markers (the spawn sections carry the actual
//! positions). `#` starts a comment line.

use glam::{Vec2, vec2};
use once_cell::sync::Lazy;
use regex::Regex;

use super::grid::GridMap;

/// An enemy or item spawn from the level file. Positions are grid
/// coordinates; whole-number inputs land on cell corners, as the section
/// format only carries integers.
#[derive(Clone, Debug, PartialEq)]
pub struct Spawn {
    pub kind: String,
    pub pos: Vec2,
}

/// Everything the loader extracts from one level file.
#[derive(Clone, Debug)]
pub struct LevelData {
    pub grid: GridMap,
    /// Center of the `P` cell; falls back to (2.5, 2.5) when absent.
    pub player_start: Vec2,
    pub enemies: Vec<Spawn>,
    pub items: Vec<Spawn>,
}

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum MapError {
    #[error("no MAP section or empty grid")]
    EmptyGrid,

    #[error("map row {0}: width differs from the first row")]
    JaggedRow(usize),

    #[error("line {0}: unknown cell character `{1}`")]
    BadCell(usize, char),

    #[error("line {0}: malformed spawn entry")]
    BadSpawn(usize),
}

#[derive(Clone, Copy, PartialEq)]
enum Section {
    None,
    Map,
    Enemies,
    Items,
}

static SPAWN_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([A-Za-z_]+)\s*,\s*(\d+)\s*,\s*(\d+)$").unwrap());

impl LevelData {
    /// Parse a level from its textual form.
    pub fn parse(src: &str) -> Result<Self, MapError> {
        let mut rows: Vec<Vec<u8>> = Vec::new();
        let mut player_start = None;
        let mut enemies = Vec::new();
        let mut items = Vec::new();
        let mut section = Section::None;

        for (idx, raw) in src.lines().enumerate() {
            let line_no = idx + 1;
            let line = raw.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            match line {
                "MAP" => {
                    section = Section::Map;
                    continue;
                }
                "ENEMIES" => {
                    section = Section::Enemies;
                    continue;
                }
                "ITEMS" => {
                    section = Section::Items;
                    continue;
                }
                "END_MAP" | "END_ENEMIES" | "END_ITEMS" => {
                    section = Section::None;
                    continue;
                }
                _ => {}
            }

            match section {
                Section::Map => {
                    let y = rows.len();
                    let mut row = Vec::with_capacity(line.len());
                    for ch in line.chars() {
                        match ch {
                            '0'..='9' => row.push(ch as u8 - b'0'),
                            'P' => {
                                player_start =
                                    Some(vec2(row.len() as f32 + 0.5, y as f32 + 0.5));
                                row.push(0);
                            }
                            // spawn markers occupy open floor
                            'E' | 'I' => row.push(0),
                            _ => return Err(MapError::BadCell(line_no, ch)),
                        }
                    }
                    rows.push(row);
                }
                Section::Enemies => enemies.push(parse_spawn(line, line_no)?),
                Section::Items => items.push(parse_spawn(line, line_no)?),
                Section::None => {}
            }
        }

        if rows.is_empty() || rows[0].is_empty() {
            return Err(MapError::EmptyGrid);
        }
        let width = rows[0].len();
        for (y, row) in rows.iter().enumerate() {
            if row.len() != width {
                return Err(MapError::JaggedRow(y + 1));
            }
        }
        let height = rows.len();
        let cells: Vec<u8> = rows.into_iter().flatten().collect();

        log::info!(
            "level loaded: {width}x{height}, {} enemy spawns, {} item spawns",
            enemies.len(),
            items.len()
        );

        Ok(Self {
            grid: GridMap::new(width, height, cells),
            player_start: player_start.unwrap_or(vec2(2.5, 2.5)),
            enemies,
            items,
        })
    }

    /// Built-in 10×10 test level used when no file is given.
    pub fn fallback() -> Self {
        Self::parse(FALLBACK_LEVEL).expect("built-in level must parse")
    }
}

fn parse_spawn(line: &str, line_no: usize) -> Result<Spawn, MapError> {
    let caps = SPAWN_RE.captures(line).ok_or(MapError::BadSpawn(line_no))?;
    let x: f32 = caps[2].parse().map_err(|_| MapError::BadSpawn(line_no))?;
    let y: f32 = caps[3].parse().map_err(|_| MapError::BadSpawn(line_no))?;
    Ok(Spawn {
        kind: caps[1].to_string(),
        pos: vec2(x, y),
    })
}

const FALLBACK_LEVEL: &str = "\
MAP
1111111111
1P00000001
1000000001
1001101001
1001001001
1000001001
1001111001
1000000001
1000000001
1111111111
END_MAP
ENEMIES
imp, 5, 5
demon, 7, 3
END_ENEMIES
ITEMS
health, 2, 2
ammo, 8, 8
END_ITEMS
";

/*====================================================================*/
/*                                Tests                               */
/*====================================================================*/
#[cfg(test)]
mod tests {
    use super::*;
    use glam::vec2;

    #[test]
    fn fallback_level_shape() {
        let lvl = LevelData::fallback();
        assert_eq!(lvl.grid.width(), 10);
        assert_eq!(lvl.grid.height(), 10);
        assert_eq!(lvl.player_start, vec2(1.5, 1.5));
        assert_eq!(lvl.enemies.len(), 2);
        assert_eq!(lvl.items.len(), 2);
        assert_eq!(lvl.enemies[0], Spawn {
            kind: "imp".into(),
            pos: vec2(5.0, 5.0),
        });
        // border ring is solid
        for i in 0..10 {
            assert!(lvl.grid.is_wall(i, 0));
            assert!(lvl.grid.is_wall(i, 9));
            assert!(lvl.grid.is_wall(0, i));
            assert!(lvl.grid.is_wall(9, i));
        }
    }

    #[test]
    fn comments_and_markers_skipped() {
        let src = "# header\nMAP\n111\n1P1\n111\nEND_MAP\n";
        let lvl = LevelData::parse(src).unwrap();
        assert_eq!(lvl.grid.width(), 3);
        assert_eq!(lvl.player_start, vec2(1.5, 1.5));
        assert!(lvl.enemies.is_empty());
    }

    #[test]
    fn spawn_markers_are_floor() {
        let src = "MAP\n11111\n1PEI1\n11111\nEND_MAP\n";
        let lvl = LevelData::parse(src).unwrap();
        assert!(!lvl.grid.is_wall(2, 1));
        assert!(!lvl.grid.is_wall(3, 1));
    }

    #[test]
    fn jagged_row_rejected() {
        let src = "MAP\n111\n11\n111\nEND_MAP\n";
        assert_eq!(LevelData::parse(src).unwrap_err(), MapError::JaggedRow(2));
    }

    #[test]
    fn unknown_cell_rejected() {
        let src = "MAP\n1x1\nEND_MAP\n";
        assert_eq!(LevelData::parse(src).unwrap_err(), MapError::BadCell(2, 'x'));
    }

    #[test]
    fn malformed_spawn_rejected() {
        let src = "MAP\n111\nEND_MAP\nENEMIES\nimp 5 5\nEND_ENEMIES\n";
        assert_eq!(LevelData::parse(src).unwrap_err(), MapError::BadSpawn(5));
    }

    #[test]
    fn empty_input_rejected() {
        assert_eq!(LevelData::parse("").unwrap_err(), MapError::EmptyGrid);
    }
}
