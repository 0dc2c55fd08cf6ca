use crate::Board;

/// Draws the board as text, one character per cell.
///
/// Pieces are shown by [`CreatureType::glyph()`](crate::CreatureType::glyph), empty
/// active cells as `·` and inactive cells as `░`.
pub fn render_board(board: &Board) -> String {
    let mut result = String::from("    ");
    for x in 0..board.width() {
        result += &format!("{:>2}", x);
    }
    result += "\n   ╭";
    for _ in 0..board.width() {
        result += "──";
    }
    result += "─╮";

    for (sq, cell) in board.iter() {
        if sq.x == 0 {
            result += &format!("\n{:>2} │", sq.y);
        }
        let glyph = match cell.occupant() {
            Some(piece) => piece.creature.glyph(piece.side),
            None if cell.is_active() => '·',
            None => '░',
        };
        result.push(' ');
        result.push(glyph);
        if sq.x == board.width() - 1 {
            result += " │";
        }
    }

    result += "\n   ╰";
    for _ in 0..board.width() {
        result += "──";
    }
    result += "─╯";
    result
}

impl std::fmt::Display for Board {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", render_board(self))
    }
}
