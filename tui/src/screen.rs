//! Crossterm rendering: the boxed minefield window, the status bar, and
//! the raw-mode/alternate-screen guard.
//!
//! Drawing works from snapshots ([`BoardView`]) taken under the state
//! lock, so no engine state is read while the terminal lock is held.

use std::io::{self, Stdout, Write, stdout};

use crossterm::cursor::{Hide, MoveTo, Show};
use crossterm::style::{
    Attribute, Color, Print, ResetColor, SetAttribute, SetForegroundColor, available_color_count,
};
use crossterm::terminal::{
    Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode,
    enable_raw_mode,
};
use crossterm::{execute, queue};

use sapper_core::{CellMark, Coord2, RoundStatus, StatusLine};

/// Classic tileset.
const FIELD: char = '%';
const EMPTY: char = ' ';
const FLAG: char = '!';
const QUESTION: char = '?';
const MINE: char = 'X';

/// Status bar region: 3 rows by 14 columns in the top-left corner.
const BAR_ORIGIN: (u16, u16) = (0, 0);
const BAR_WIDTH: u16 = 14;
const BAR_HEIGHT: u16 = 3;

/// The board window sits below the bar.
const BOARD_ORIGIN: (u16, u16) = (0, 3);

/// Fixed palette for adjacency counts 1..=8.
const COUNT_COLORS: [Color; 8] = [
    Color::Blue,
    Color::Green,
    Color::Red,
    Color::Blue,
    Color::Magenta,
    Color::Cyan,
    Color::DarkGrey,
    Color::White,
];

/// One cell as captured for drawing.
#[derive(Copy, Clone, Debug)]
pub struct CellView {
    pub mark: CellMark,
    pub mined: bool,
    pub adjacent: i8,
}

/// Snapshot of the whole board for one frame, row-major.
#[derive(Clone, Debug)]
pub struct BoardView {
    pub size: Coord2,
    pub cursor: Coord2,
    pub status: RoundStatus,
    pub cells: Vec<CellView>,
}

impl BoardView {
    fn cell(&self, (x, y): Coord2) -> CellView {
        self.cells[usize::from(y) * usize::from(self.size.0) + usize::from(x)]
    }
}

/// Terminal handle. Construction enters raw mode and the alternate
/// screen; `Drop` restores both, on every exit path.
pub struct Screen {
    out: Stdout,
    colored: bool,
}

impl Screen {
    pub fn new() -> io::Result<Self> {
        enable_raw_mode()?;
        let mut out = stdout();
        execute!(out, EnterAlternateScreen, Hide)?;
        let colored = available_color_count() >= 8;
        log::debug!("terminal ready, colors {}", if colored { "on" } else { "off" });
        Ok(Self { out, colored })
    }

    pub fn clear(&mut self) -> io::Result<()> {
        execute!(self.out, Clear(ClearType::All))
    }

    pub fn draw_board(&mut self, view: &BoardView) -> io::Result<()> {
        let (width, height) = view.size;
        let (origin_x, origin_y) = BOARD_ORIGIN;

        self.queue_box(BOARD_ORIGIN, u16::from(width) + 4, u16::from(height) + 2)?;
        for y in 0..height {
            for x in 0..width {
                let cell = view.cell((x, y));
                let (glyph, count) = cell_glyph(cell, view.status);

                queue!(
                    self.out,
                    MoveTo(origin_x + 2 + u16::from(x), origin_y + 1 + u16::from(y))
                )?;
                if self.colored && count > 0 {
                    queue!(
                        self.out,
                        SetForegroundColor(COUNT_COLORS[(count - 1) as usize]),
                        SetAttribute(Attribute::Bold)
                    )?;
                }
                if (x, y) == view.cursor {
                    queue!(self.out, SetAttribute(Attribute::Underlined))?;
                }
                queue!(
                    self.out,
                    Print(glyph),
                    SetAttribute(Attribute::Reset),
                    ResetColor
                )?;
            }
        }
        self.out.flush()
    }

    pub fn draw_bar(&mut self, line: &StatusLine) -> io::Result<()> {
        self.queue_box(BAR_ORIGIN, BAR_WIDTH, BAR_HEIGHT)?;
        queue!(
            self.out,
            MoveTo(BAR_ORIGIN.0 + 2, BAR_ORIGIN.1 + 1),
            Print(format!(
                "{:03} {} {:03}",
                line.mines_left,
                line.face(),
                line.elapsed_secs
            ))
        )?;
        self.out.flush()
    }

    pub fn prompt_new_game(&mut self, score: u32) -> io::Result<()> {
        execute!(
            self.out,
            Clear(ClearType::All),
            MoveTo(0, 0),
            Print(format!("Time: {score:03}s   New game (y/N)? "))
        )
    }

    fn queue_box(&mut self, (origin_x, origin_y): (u16, u16), width: u16, height: u16) -> io::Result<()> {
        queue!(self.out, MoveTo(origin_x, origin_y), Print('┌'))?;
        for _ in 1..width - 1 {
            queue!(self.out, Print('─'))?;
        }
        queue!(self.out, Print('┐'))?;
        for row in 1..height - 1 {
            queue!(
                self.out,
                MoveTo(origin_x, origin_y + row),
                Print('│'),
                MoveTo(origin_x + width - 1, origin_y + row),
                Print('│')
            )?;
        }
        queue!(self.out, MoveTo(origin_x, origin_y + height - 1), Print('└'))?;
        for _ in 1..width - 1 {
            queue!(self.out, Print('─'))?;
        }
        queue!(self.out, Print('┘'))?;
        Ok(())
    }
}

impl Drop for Screen {
    fn drop(&mut self) {
        let _ = execute!(self.out, Show, LeaveAlternateScreen);
        let _ = disable_raw_mode();
    }
}

/// Pick the glyph for one cell. Mines are exposed on a loss and shown as
/// flags on a win; otherwise the player's own marking is drawn, with
/// revealed cells carrying their colored adjacency count.
fn cell_glyph(cell: CellView, status: RoundStatus) -> (char, i8) {
    if cell.mined {
        match status {
            RoundStatus::GameOver => return (MINE, 0),
            RoundStatus::Win => return (FLAG, 0),
            _ => {}
        }
    }
    match cell.mark {
        CellMark::Hidden => (FIELD, 0),
        CellMark::Flagged => (FLAG, 0),
        CellMark::Questioned => (QUESTION, 0),
        // A revealed mine outside a finished round only exists for the
        // one frame before the loss scan runs.
        CellMark::Revealed if cell.mined => (MINE, 0),
        CellMark::Revealed => match cell.adjacent {
            count @ 1..=8 => ((b'0' + count as u8) as char, count),
            _ => (EMPTY, 0),
        },
    }
}
