use std::{collections::HashSet, io::Write};

use crossterm::{
    cursor, queue,
    style::{self, Color, Stylize},
    terminal::{self, ClearType},
};

use super::{Board, Coord, GridCell};

/// Things drawn on top of the board's cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Overlay {
    Start,
    Target,
    Route,
}

impl Overlay {
    fn symbol(self) -> style::StyledContent<&'static str> {
        match self {
            Overlay::Start => "🟩".with(Color::Green),
            Overlay::Target => "🟥".with(Color::Red),
            Overlay::Route => "* ".with(Color::Yellow),
        }
    }
}

fn overlay_at(board: &Board, route: &HashSet<Coord>, coord: Coord) -> Option<Overlay> {
    if coord == board.start() {
        Some(Overlay::Start)
    } else if coord == board.target() {
        Some(Overlay::Target)
    } else if route.contains(&coord) {
        Some(Overlay::Route)
    } else {
        None
    }
}

/// Queue a full frame of the board, with start, target and any solution path on top.
/// The caller decides when to flush.
pub fn render_board<W: Write>(board: &Board, out: &mut W) -> std::io::Result<()> {
    let route: HashSet<Coord> = board.path().unwrap_or_default().iter().copied().collect();
    for row in 0..board.v_cells() {
        for col in 0..board.h_cells() {
            match overlay_at(board, &route, (row, col)) {
                Some(overlay) => queue!(out, style::PrintStyledContent(overlay.symbol()))?,
                None => queue!(out, style::Print(board[(row, col)]))?,
            }
        }
        queue!(out, style::Print("\r\n"))?;
    }
    Ok(())
}

/// Clear the terminal and draw the board from the top-left corner.
pub fn draw_board<W: Write>(board: &Board, out: &mut W) -> std::io::Result<()> {
    queue!(out, terminal::Clear(ClearType::All), cursor::MoveTo(0, 0))?;
    render_board(board, out)?;
    out.flush()
}

/// Check whether a terminal of the given size can show the board.
pub fn fits_terminal(board: &Board, term_width: u16, term_height: u16) -> bool {
    (board.h_cells() as u32) * (GridCell::CELL_WIDTH as u32) <= term_width as u32
        && board.v_cells() <= term_height
}
