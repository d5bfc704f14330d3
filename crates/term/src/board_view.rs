//! BoardView: paints a game snapshot into a frame.
//!
//! Layout, top to bottom: title, column labels, one text row per board row
//! (each tile `TILE_COLS` characters wide), then a status block and the most
//! recent move-log lines.
//!
//! Pieces in motion are drawn on the tile nearest their interpolated position,
//! on top of stationary pieces.

use crate::core::{GameSnapshot, PieceSnapshot};
use crate::frame::{CellStyle, Frame, Rgb};
use crate::types::{PlayerId, Position, Winner};

/// Characters per tile.
pub const TILE_COLS: u16 = 3;

const LABEL_COLS: u16 = 3;
const HEADER_ROWS: u16 = 2;
const STATUS_ROWS: u16 = 3;

const LIGHT: Rgb = Rgb::new(181, 136, 99);
const DARK: Rgb = Rgb::new(120, 82, 52);
const P1_CURSOR: Rgb = Rgb::new(40, 90, 170);
const P2_CURSOR: Rgb = Rgb::new(170, 50, 50);
const SELECTED: Rgb = Rgb::new(200, 170, 40);
const P1_PIECE: Rgb = Rgb::new(250, 250, 250);
const P2_PIECE: Rgb = Rgb::new(20, 20, 20);
const TEXT: Rgb = Rgb::new(220, 220, 220);
const BLACK: Rgb = Rgb::new(0, 0, 0);

#[derive(Debug, Clone, Copy, Default)]
pub struct BoardView;

impl BoardView {
    pub fn new() -> Self {
        Self
    }

    /// Frame size needed for `snapshot` plus `log_lines` lines of move log.
    pub fn frame_size(&self, snapshot: &GameSnapshot, log_lines: usize) -> (u16, u16) {
        let dim = u16::from(snapshot.dimension);
        let board_width = LABEL_COLS + dim * TILE_COLS;
        let height = HEADER_ROWS + dim + 1 + STATUS_ROWS + log_lines as u16;
        (board_width.max(40), height)
    }

    /// Paint into `frame`, resizing it to [`frame_size`](Self::frame_size).
    pub fn render(&self, snapshot: &GameSnapshot, log: &[String], frame: &mut Frame) {
        let (width, height) = self.frame_size(snapshot, log.len());
        frame.reset(width, height);
        let text = CellStyle::on(TEXT, BLACK);

        frame.put_str(0, 0, "Kung Fu Chess", text.bold());
        for col in 0..snapshot.dimension {
            let label = char::from(b'a' + col);
            frame.put_char(self.tile_x(col) + 1, 1, label, text.dim());
        }

        self.paint_tiles(snapshot, frame);
        self.paint_pieces(snapshot, frame);

        let mut y = HEADER_ROWS + u16::from(snapshot.dimension) + 1;
        for id in [PlayerId::One, PlayerId::Two] {
            frame.put_str(0, y, &player_line(snapshot, id), text);
            y += 1;
        }
        frame.put_str(0, y, &outcome_line(snapshot), text.bold());
        y += 1;
        for line in log {
            frame.put_str(0, y, line, text.dim());
            y += 1;
        }
    }

    fn tile_x(&self, col: u8) -> u16 {
        LABEL_COLS + u16::from(col) * TILE_COLS
    }

    fn tile_y(&self, row: u8) -> u16 {
        HEADER_ROWS + u16::from(row)
    }

    fn paint_tiles(&self, snapshot: &GameSnapshot, frame: &mut Frame) {
        let text = CellStyle::on(TEXT, BLACK);
        let p1 = snapshot.player(PlayerId::One);
        let p2 = snapshot.player(PlayerId::Two);

        for row in 0..snapshot.dimension {
            frame.put_str(0, self.tile_y(row), &format!("{:>2}", row + 1), text.dim());
            for col in 0..snapshot.dimension {
                let at = Position::new(row, col);
                let bg = if p1.selection == Some(at) || p2.selection == Some(at) {
                    SELECTED
                } else if p1.cursor == Some(at) {
                    P1_CURSOR
                } else if p2.cursor == Some(at) {
                    P2_CURSOR
                } else if (row + col) % 2 == 0 {
                    LIGHT
                } else {
                    DARK
                };
                self.fill_tile(frame, at, ' ', CellStyle::on(TEXT, bg));
            }
        }
    }

    fn paint_pieces(&self, snapshot: &GameSnapshot, frame: &mut Frame) {
        let (moving, still): (Vec<&PieceSnapshot>, Vec<&PieceSnapshot>) = snapshot
            .pieces
            .iter()
            .partition(|piece| piece.state.is_in_motion());

        for piece in still.into_iter().chain(moving) {
            let at = piece.drawn_tile(snapshot.tile_size, snapshot.dimension);
            let x = self.tile_x(at.col) + 1;
            let y = self.tile_y(at.row);
            let bg = frame.get(x, y).map(|cell| cell.style.bg).unwrap_or(BLACK);
            let fg = match piece.owner {
                PlayerId::One => P1_PIECE,
                PlayerId::Two => P2_PIECE,
            };
            let mut style = CellStyle::on(fg, bg).bold();
            if piece.state.is_resting() {
                style = style.dim();
            }
            let code = match piece.owner {
                PlayerId::One => piece.kind.code(),
                PlayerId::Two => piece.kind.code().to_ascii_lowercase(),
            };
            frame.put_char(x, y, code, style);
        }
    }

    fn fill_tile(&self, frame: &mut Frame, at: Position, ch: char, style: CellStyle) {
        let x = self.tile_x(at.col);
        for dx in 0..TILE_COLS {
            frame.put_char(x + dx, self.tile_y(at.row), ch, style);
        }
    }
}

fn player_line(snapshot: &GameSnapshot, id: PlayerId) -> String {
    let player = snapshot.player(id);
    let keys = match id {
        PlayerId::One => "WASD+Space",
        PlayerId::Two => "arrows+Enter",
    };
    let status = if player.failed { "lost its king" } else { "playing" };
    format!("{} ({keys}): {status}", player.name)
}

fn outcome_line(snapshot: &GameSnapshot) -> String {
    match snapshot.winner {
        Winner::Player1 => format!("{} wins! q to quit", snapshot.player(PlayerId::One).name),
        Winner::Player2 => format!("{} wins! q to quit", snapshot.player(PlayerId::Two).name),
        Winner::None => "q to quit".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{GameConfig, PlayerSnapshot};
    use crate::types::{MovementState, PieceKind};

    fn snapshot(pieces: Vec<PieceSnapshot>) -> GameSnapshot {
        let player = |id, name: &str, cursor| PlayerSnapshot {
            id,
            name: name.to_string(),
            failed: false,
            cursor,
            selection: None,
        };
        GameSnapshot {
            dimension: 4,
            tile_size: 64.0,
            pieces,
            players: [
                player(PlayerId::One, "Player 1", Some(Position::new(0, 0))),
                player(PlayerId::Two, "Player 2", None),
            ],
            winner: Winner::None,
            started: true,
            ended: false,
        }
    }

    fn piece(kind: PieceKind, owner: PlayerId, position: Position, x: f64, y: f64) -> PieceSnapshot {
        PieceSnapshot {
            kind,
            owner,
            position,
            x,
            y,
            state: MovementState::Idle,
        }
    }

    #[test]
    fn renders_pieces_on_their_tiles() {
        let snap = snapshot(vec![
            piece(PieceKind::King, PlayerId::One, Position::new(0, 1), 64.0, 0.0),
            piece(PieceKind::Queen, PlayerId::Two, Position::new(3, 3), 192.0, 192.0),
        ]);
        let mut frame = Frame::new(0, 0);
        BoardView::new().render(&snap, &["Moving Rook".to_string()], &mut frame);

        assert_eq!(frame.row_text(0).trim_end(), "Kung Fu Chess");
        assert_eq!(frame.row_text(1).trim_end(), "    a  b  c  d");
        assert_eq!(frame.row_text(2).trim_end(), " 1     K");
        assert_eq!(frame.row_text(5).trim_end(), " 4           q");
        assert_eq!(frame.row_text(frame.height() - 1).trim_end(), "Moving Rook");
    }

    #[test]
    fn moving_piece_is_drawn_at_nearest_tile() {
        let mut rook = piece(PieceKind::Rook, PlayerId::One, Position::new(0, 3), 70.0, 0.0);
        rook.state = MovementState::Move;
        let snap = snapshot(vec![rook]);
        let mut frame = Frame::new(0, 0);
        BoardView::new().render(&snap, &[], &mut frame);
        assert_eq!(frame.row_text(2).trim_end(), " 1     R");
    }

    #[test]
    fn cursor_tile_is_highlighted() {
        let snap = snapshot(Vec::new());
        let mut frame = Frame::new(0, 0);
        BoardView::new().render(&snap, &[], &mut frame);
        assert_eq!(frame.get(LABEL_COLS, HEADER_ROWS).unwrap().style.bg, P1_CURSOR);
        assert_eq!(frame.get(LABEL_COLS + TILE_COLS, HEADER_ROWS).unwrap().style.bg, DARK);
    }

    #[test]
    fn standard_game_fits_its_frame() {
        let game = crate::core::Game::standard(
            &GameConfig::default(),
            std::sync::Arc::new(crate::core::events::EventBus::new()),
        )
        .unwrap();
        let snap = game.snapshot();
        let view = BoardView::new();
        let mut frame = Frame::new(0, 0);
        view.render(&snap, &[], &mut frame);
        assert_eq!((frame.width(), frame.height()), view.frame_size(&snap, 0));
        assert!(frame.row_text(2).contains('R'));
        assert!(frame.row_text(9).contains('r'));
        assert!(frame.row_text(13).contains("q to quit"));
    }
}
