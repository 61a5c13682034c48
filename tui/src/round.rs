//! One round from board generation to win, loss, or quit: the input
//! loop, the shared round state, and the status-bar thread.
//!
//! Two threads touch a round. Everything mutable lives behind a single
//! state mutex; the terminal writer has its own. Lock discipline: never
//! take the screen lock while holding the state lock. Each thread
//! snapshots under the state lock, releases it, then draws.

use std::sync::Mutex;
use std::thread;
use std::time::{Duration, Instant};

use sapper_core::{
    Clock, Coord2, GameConfig, MineLayoutGenerator, RandomMineLayoutGenerator, Round, StatusLine,
    Stopwatch,
};

use crate::input::{self, Action, Direction};
use crate::screen::{BoardView, CellView, Screen};

/// Bar refresh cadence. Must stay well under a second so the timer
/// display never skips.
const BAR_POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Mutable state shared between the input loop and the bar thread.
struct RoundState {
    round: Round,
    cursor: Coord2,
    timer_running: bool,
    ended: bool,
    score: u32,
}

impl RoundState {
    fn new(round: Round) -> Self {
        Self {
            round,
            cursor: (0, 0),
            timer_running: false,
            ended: false,
            score: 0,
        }
    }

    /// Step the cursor and clamp it back onto the board.
    fn move_cursor(&mut self, direction: Direction) {
        let (width, height) = self.round.size();
        let (x, y) = self.cursor;
        self.cursor = match direction {
            Direction::Up => (x, y.saturating_sub(1)),
            Direction::Down => (x, (y + 1).min(height - 1)),
            Direction::Left => (x.saturating_sub(1), y),
            Direction::Right => ((x + 1).min(width - 1), y),
        };
    }

    fn board_view(&self) -> BoardView {
        let (width, height) = self.round.size();
        let mut cells = Vec::with_capacity(usize::from(width) * usize::from(height));
        for y in 0..height {
            for x in 0..width {
                cells.push(CellView {
                    mark: self.round.mark_at((x, y)),
                    mined: self.round.has_mine_at((x, y)),
                    adjacent: self.round.adjacent_mine_count((x, y)),
                });
            }
        }
        BoardView {
            size: (width, height),
            cursor: self.cursor,
            status: self.round.status(),
            cells,
        }
    }

    fn status_line(&self, elapsed_secs: u32) -> StatusLine {
        StatusLine {
            mines_left: self.round.mines_left(),
            status: self.round.status(),
            elapsed_secs,
        }
    }
}

/// Seconds since the clock was created.
struct SystemClock {
    epoch: Instant,
}

impl SystemClock {
    fn new() -> Self {
        Self {
            epoch: Instant::now(),
        }
    }
}

impl Clock for SystemClock {
    fn now_secs(&self) -> u64 {
        self.epoch.elapsed().as_secs()
    }
}

/// Play one round to completion and return its elapsed-seconds score.
pub fn run(config: GameConfig, seed: u64, screen: &Mutex<Screen>) -> anyhow::Result<u32> {
    let layout = RandomMineLayoutGenerator::new(seed).generate(config);
    let state = Mutex::new(RoundState::new(Round::new(layout)));

    screen.lock().unwrap().clear()?;

    thread::scope(|scope| {
        scope.spawn(|| bar_loop(&state, screen));
        let result = input_loop(&state, screen);
        // The bar thread exits on the ended flag; set it here too so the
        // scope joins even when the input loop bailed out with an error.
        state.lock().unwrap().ended = true;
        result
    })?;

    Ok(state.into_inner().unwrap().score)
}

fn input_loop(state: &Mutex<RoundState>, screen: &Mutex<Screen>) -> anyhow::Result<()> {
    loop {
        let view = state.lock().unwrap().board_view();
        screen.lock().unwrap().draw_board(&view)?;

        let action = input::read_action()?;
        let mut st = state.lock().unwrap();
        let cursor = st.cursor;
        match action {
            Action::Move(direction) => st.move_cursor(direction),
            Action::Flag => {
                st.round.flag(cursor)?;
            }
            Action::Reveal => {
                if st.round.reveal(cursor)?.has_update() {
                    st.timer_running = true;
                }
            }
            Action::Quit => st.ended = true,
        }

        // Runs after every action, even pure cursor moves; a no-op then.
        let status = st.round.evaluate();

        if status.is_terminal() && !st.ended {
            // Freeze the timer, show the final board, wait for one key.
            st.timer_running = false;
            let view = st.board_view();
            drop(st);
            screen.lock().unwrap().draw_board(&view)?;
            input::wait_any_key()?;
            state.lock().unwrap().ended = true;
            return Ok(());
        }

        if st.ended {
            return Ok(());
        }
    }
}

/// Status-bar refresher. Polls the shared state, redraws only when a
/// displayed value changed, and records the final elapsed value as the
/// round's score before exiting.
fn bar_loop(state: &Mutex<RoundState>, screen: &Mutex<Screen>) {
    let clock = SystemClock::new();
    let mut stopwatch = Stopwatch::default();
    let mut shown: Option<StatusLine> = None;

    loop {
        let (line, ended) = {
            let mut st = state.lock().unwrap();
            let elapsed = stopwatch.observe(st.timer_running, &clock);
            if st.ended {
                st.score = elapsed;
            }
            (st.status_line(elapsed), st.ended)
        };

        if shown != Some(line) {
            shown = Some(line);
            if let Err(err) = screen.lock().unwrap().draw_bar(&line) {
                log::warn!("status bar redraw failed: {err}");
            }
        }

        if ended {
            return;
        }
        thread::sleep(BAR_POLL_INTERVAL);
    }
}
