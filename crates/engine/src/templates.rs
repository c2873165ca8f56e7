//! Built-in block templates.

use crate::cell::{ANY_CHAR, BLOCKED_CHAR};
use crate::grid::Grid;

/// Default block layouts, smallest first. Each is a flat `#`/`.` board string.
pub const DEFAULT_TEMPLATES: &[&str] = &[
    "...##....#.....#....##...",
    "##.....................##",
    "##...#.............#...##",
    "##....##................#................##....##",
    "##...###.....#..........#..........#.....###...##",
    "#...###.....##......#.......#......##.....###...#",
    "....#..........#..........#...........#.............###...#...#...###.............#...........#..........#..........#....",
    "....##.........#..........#.............#...###........#....#....#........###...#.............#..........#.........##....",
    ".....#..........#..........#.....##......###....#.........#...#.........#....###......##.....#..........#..........#.....",
    "....#...#........#...#........#...#.............#...###....#....#...#...#...........#...........#...#...#....#....###...#.............#...#........#...#........#...#....",
    "...#....#.......#....#............#....###...............##...###....#...........#.....#...........#....###...##...............###....#............#....#.......#....#...",
    "....#...##.......#....#.......#....#...###................#....##...#...#.........#...#.........#...#...##....#................###...#....#.......#....#.......##...#....",
    ".....#.....#........#.....#..............#......#......#........#....#..........#...............#....#...###....#....###...#....#...............#..........#....#........#......#......#..............#.....#........#.....#.....",
    ".....#.....#........#.....#..............#......#....#.............#.......###.................##....#.......#.....#.......#....##.................###.......#.............#....#......#..............#.....#........#.....#.....",
    ".......##.............#..............#............#.....#.......##....#.........#...#...........#........###.........###........#...........#...#.........#....##.......#.....#............#..............#.............##.......",
    "...#.....#........#.....#........#...............#.....#...........##...#####..................##....#.......#.....#.......#....##..................#####...##...........#.....#...............#........#.....#........#.....#...",
    ".....#.....#........#.....#........#.............#...#.........#.....#...........#...#....#...........#####...........#####...........#....#...#...........#.....#.........#...#.............#........#.....#........#.....#.....",
    "....##.....##........#.......#........#.......#............#........###......#....####....#....#.....#......#....#............#....#.......#....#....#.......#....#............#....#......#.....#....#....####....#......###........#............#.......#........#.......#........##.....##....",
    ".....#......#.........#......#.........#......#..........#...#......###........#........#.....#....###.....#.......#..........#.............#...#...#.............#..........#.......#.....###....#.....#........#........###......#...#..........#......#.........#......#.........#......#.....",
    ".....#....#...........#....#................#.........#...#....#....###....##.....###.......#.....#........#.....#........##....##......#.......#.......#......##....##........#.....#........#.....#.......###.....##....###....#....#...#.........#................#....#...........#....#.....",
    ".....#.....#..........#.....#..........#.....#..........#.....#...........#.......###.......#.....#...#......#.........#####.....#...........#.....#...........#.....#####.........#......#...#.....#.......###.......#...........#.....#..........#.....#..........#.....#..........#.....#.....",
];

/// Templates from `templates` whose side length is `size`.
pub fn templates_for_size<'a, I>(templates: I, size: usize) -> Vec<&'a str>
where
    I: IntoIterator<Item = &'a str>,
{
    let cells = size * size;
    templates
        .into_iter()
        .filter(|t| t.chars().count() == cells)
        .collect()
}

/// Built-in templates with side length `size`.
pub fn default_templates(size: usize) -> Vec<&'static str> {
    templates_for_size(DEFAULT_TEMPLATES.iter().copied(), size)
}

/// True if `template` holds only block and open markers and forms a square.
pub fn is_template(template: &str) -> bool {
    let len = template.chars().count();
    let side = (len as f64).sqrt() as usize;
    len > 0
        && side * side == len
        && template.chars().all(|c| c == BLOCKED_CHAR || c == ANY_CHAR)
}

/// Block layout of `grid`, ready to store as a template.
pub fn template_from_grid(grid: &Grid) -> String {
    grid.template()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::segment::segment;

    #[test]
    fn test_defaults_are_square_templates() {
        for t in DEFAULT_TEMPLATES {
            assert!(is_template(t), "{t}");
        }
    }

    #[test]
    fn test_sizes() {
        assert_eq!(default_templates(5).len(), 3);
        assert_eq!(default_templates(7).len(), 3);
        assert_eq!(default_templates(11).len(), 3);
        assert_eq!(default_templates(13).len(), 3);
        assert_eq!(default_templates(15).len(), 5);
        assert_eq!(default_templates(17).len(), 4);
        assert!(default_templates(9).is_empty());
    }

    #[test]
    fn test_defaults_are_symmetric() {
        for t in DEFAULT_TEMPLATES {
            let grid = Grid::from_board_string(t).unwrap();
            for i in 0..grid.len() {
                if let Some(p) = grid.partner(i) {
                    assert_eq!(grid.is_blocked(i), grid.is_blocked(p), "{t} cell {i}");
                }
            }
        }
    }

    #[test]
    fn test_template_segments() {
        let grid = Grid::from_board_string(DEFAULT_TEMPLATES[0]).unwrap();
        let layout = segment(&grid);
        assert!(layout.across().count() > 0);
        assert_eq!(template_from_grid(&grid), DEFAULT_TEMPLATES[0]);
    }

    #[test]
    fn test_is_template_rejects_letters() {
        assert!(!is_template("a..#"));
        assert!(!is_template("..."));
        assert!(!is_template(""));
    }
}
