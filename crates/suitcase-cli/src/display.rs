//! Text rendering of game snapshots for the console harness.
//!
//! [`SnapshotDisplay`] keeps a fixed grid of lines (4 × 40 by default) and
//! redraws it from every [`GameSnapshot`] it is handed. Times are shown as
//! `MM:SS`.

use std::fmt;
use suitcase_core::Team;
use suitcase_game::{
    BombStage, BombState, BunkerState, FlagState, GameSnapshot, MenuLevel, MenuState, Mode,
};

const DEFAULT_LINES: usize = 4;
const DEFAULT_COLUMNS: usize = 40;

/// Horizontal placement of a line's text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Alignment {
    Left,
    /// Extra space goes on the right when the padding is odd.
    Center,
    Right,
}

/// Fixed-size text grid redrawn from snapshots.
#[derive(Debug, Clone)]
pub struct SnapshotDisplay {
    columns: usize,
    buffer: Vec<String>,
    revision: Option<u64>,
}

impl Default for SnapshotDisplay {
    fn default() -> Self {
        Self::new()
    }
}

impl SnapshotDisplay {
    pub fn new() -> Self {
        Self::with_size(DEFAULT_LINES, DEFAULT_COLUMNS)
    }

    pub fn with_size(lines: usize, columns: usize) -> Self {
        Self {
            columns,
            buffer: vec![" ".repeat(columns); lines],
            revision: None,
        }
    }

    /// Redraw from `snapshot`.
    ///
    /// Returns `false` without touching the grid when this revision was
    /// already rendered.
    pub fn render(&mut self, snapshot: &GameSnapshot) -> bool {
        if self.revision == Some(snapshot.revision) {
            return false;
        }
        self.revision = Some(snapshot.revision);
        self.clear();

        let rows = match &snapshot.mode {
            Mode::Menu(menu) => menu_rows(menu),
            Mode::Bomb(bomb) => bomb_rows(bomb, snapshot.nfc_available),
            Mode::Bunker(bunker) => bunker_rows(bunker),
            Mode::Flag(flag) => flag_rows(flag),
        };
        for (index, (text, align)) in rows.into_iter().enumerate() {
            self.set_line(index, &text, align);
        }
        true
    }

    /// Write `text` on one line. Lines past the bottom of the grid are dropped.
    pub fn set_line(&mut self, line: usize, text: &str, align: Alignment) {
        let columns = self.columns;
        if let Some(slot) = self.buffer.get_mut(line) {
            *slot = align_text(&sanitize_text(text), columns, align);
        }
    }

    pub fn clear(&mut self) {
        for line in &mut self.buffer {
            *line = " ".repeat(self.columns);
        }
    }

    pub fn line(&self, line: usize) -> Option<&str> {
        self.buffer.get(line).map(String::as_str)
    }

    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.buffer.iter().map(String::as_str)
    }
}

impl fmt::Display for SnapshotDisplay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let border = format!("+{}+", "-".repeat(self.columns));
        writeln!(f, "{border}")?;
        for line in &self.buffer {
            writeln!(f, "|{line}|")?;
        }
        write!(f, "{border}")
    }
}

type Rows = Vec<(String, Alignment)>;

fn menu_rows(menu: &MenuState) -> Rows {
    let title = match menu.level {
        MenuLevel::SelectGame => "SELECT GAME",
        MenuLevel::SelectBombDifficulty => "SELECT DIFFICULTY",
    };
    let options = menu
        .options()
        .iter()
        .enumerate()
        .map(|(index, name)| {
            if menu.selection == Some(index) {
                format!("[{}:{}]", index + 1, name)
            } else {
                format!(" {}:{} ", index + 1, name)
            }
        })
        .collect::<Vec<_>>()
        .join(" ");
    let hint = match menu.level {
        MenuLevel::SelectGame => "blue to start",
        MenuLevel::SelectBombDifficulty => "blue to start, red to go back",
    };
    vec![
        (title.to_string(), Alignment::Center),
        (options, Alignment::Center),
        (String::new(), Alignment::Left),
        (hint.to_string(), Alignment::Center),
    ]
}

fn bomb_rows(bomb: &BombState, nfc_available: bool) -> Rows {
    let title = format!("BOMB {}", bomb.difficulty.to_string().to_uppercase());
    let clock = format_clock(bomb.remaining_secs);
    let entry = format!("> {}", bomb.input_text());

    let (status, detail) = match bomb.stage {
        BombStage::AwaitNfc => {
            let hint = if nfc_available {
                "present the card".to_string()
            } else {
                "no reader, press A".to_string()
            };
            ("UNLOCK".to_string(), hint)
        }
        BombStage::AwaitCode => ("ARM".to_string(), code_line("code", bomb)),
        BombStage::Countdown => (clock, code_line("defuse", bomb)),
        BombStage::AwaitReentry => (format!("{clock} HOLD"), code_line("re-arm", bomb)),
        BombStage::Locked => (
            format!("LOCKED {}", format_clock(bomb.lock_remaining_secs)),
            format!("failed attempts: {}", bomb.failed_attempts),
        ),
        BombStage::Ended => (
            "GAME OVER".to_string(),
            bomb.outcome.map(|o| o.to_string()).unwrap_or_default(),
        ),
    };

    let entry = match bomb.stage {
        BombStage::AwaitCode | BombStage::Countdown | BombStage::AwaitReentry => entry,
        _ => String::new(),
    };
    vec![
        (title, Alignment::Left),
        (status, Alignment::Center),
        (detail, Alignment::Left),
        (entry, Alignment::Left),
    ]
}

fn code_line(label: &str, bomb: &BombState) -> String {
    match bomb.expected_code() {
        Some(code) => format!("{label}: {code}"),
        None => String::new(),
    }
}

fn bunker_rows(bunker: &BunkerState) -> Rows {
    let clocks = format!(
        "RED {}   BLUE {}",
        format_clock(bunker.seconds(Team::Red)),
        format_clock(bunker.seconds(Team::Blue))
    );
    let status = match (bunker.winner, bunker.active_team) {
        (Some(team), _) => format!("{team} WINS"),
        (None, Some(team)) => format!("held by {team}"),
        (None, None) => "nobody holds the bunker".to_string(),
    };
    let signal = if bunker.signal_active {
        "signal on".to_string()
    } else {
        String::new()
    };
    vec![
        ("BUNKER".to_string(), Alignment::Left),
        (clocks, Alignment::Center),
        (status, Alignment::Center),
        (signal, Alignment::Center),
    ]
}

fn flag_rows(flag: &FlagState) -> Rows {
    let status = match flag.controlling_team {
        Some(team) => format!("flag held by {team}"),
        None => "flag is free".to_string(),
    };
    vec![
        ("FLAG".to_string(), Alignment::Left),
        (status, Alignment::Center),
    ]
}

/// Format whole seconds as `MM:SS`. Minutes keep growing past 99.
pub fn format_clock(secs: u32) -> String {
    format!("{:02}:{:02}", secs / 60, secs % 60)
}

pub fn truncate_text(text: &str, max_chars: usize) -> String {
    text.chars().take(max_chars).collect()
}

/// Pad `text` to exactly `width` characters, truncating when it is longer.
pub fn align_text(text: &str, width: usize, alignment: Alignment) -> String {
    let char_count = text.chars().count();
    if char_count >= width {
        return truncate_text(text, width);
    }

    let padding = width - char_count;
    match alignment {
        Alignment::Left => format!("{}{}", text, " ".repeat(padding)),
        Alignment::Right => format!("{}{}", " ".repeat(padding), text),
        Alignment::Center => {
            let left_pad = padding / 2;
            let right_pad = padding - left_pad;
            format!("{}{}{}", " ".repeat(left_pad), text, " ".repeat(right_pad))
        }
    }
}

fn sanitize_text(text: &str) -> String {
    text.chars()
        .filter(|c| !c.is_control())
        .collect::<String>()
        .trim()
        .to_string()
}
