//! Player — the interactive terminal front end.
//!
//! Owns a `Sequencer` over a `CellCanvas` and drives it from the keyboard.
//! The player never decides what is drawn; it forwards intents to the
//! sequencer and repaints whatever the canvas holds afterwards.

use std::io::{self, Write};

use anyhow::{Result, bail};
use crossterm::{cursor, event, execute, queue, style, terminal};
use tracing::{debug, info};

use crate::canvas::CellCanvas;
use crate::config::KeyBindings;
use crate::input::{InputMapper, Intent};
use crate::menubar::print_menu_item;
use crate::position::PositionPublisher;
use crate::sequencer::Sequencer;
use crate::types::{Cell, Color, NamedColor, Style};

/// Rows reserved above the canvas for the menu bar.
const CANVAS_OFFSET: u16 = 1;

pub struct Player<P> {
    sequencer: Sequencer<CellCanvas, P>,
    mapper: InputMapper,
}

impl<P: PositionPublisher> Player<P> {
    pub fn new(sequencer: Sequencer<CellCanvas, P>, mapper: InputMapper) -> Self {
        Self { sequencer, mapper }
    }

    pub fn sequencer(&self) -> &Sequencer<CellCanvas, P> {
        &self.sequencer
    }

    /// Play the catalog in the terminal.
    ///
    /// Sets up the terminal, resumes at the published position, enters the
    /// event loop, and restores the terminal on exit (even on error).
    pub fn play(&mut self) -> Result<()> {
        let (term_w, term_h) = terminal::size()?;
        let need_w = self.sequencer.surface().width();
        let need_h = self.sequencer.surface().height();
        // +2: one row for menu bar, one row for status bar
        if term_w < need_w || term_h < need_h + 2 {
            bail!(
                "Terminal too small: need {}x{}, have {}x{}",
                need_w,
                need_h + 2,
                term_w,
                term_h,
            );
        }

        let resumed = self.sequencer.resume()?;
        info!(resumed, steps = self.sequencer.len(), "starting playback");

        let mut stdout = io::stdout();
        terminal::enable_raw_mode()?;
        execute!(
            stdout,
            terminal::EnterAlternateScreen,
            cursor::Hide,
            terminal::Clear(terminal::ClearType::All),
        )?;

        let result = self.run_loop(&mut stdout);

        // Always restore terminal state.
        let _ = execute!(stdout, cursor::Show, terminal::LeaveAlternateScreen);
        let _ = terminal::disable_raw_mode();

        result
    }

    // -----------------------------------------------------------------------
    // Event loop
    // -----------------------------------------------------------------------

    fn run_loop(&mut self, stdout: &mut io::Stdout) -> Result<()> {
        self.render_menubar(stdout)?;
        self.render_full(stdout)?;
        self.render_status(stdout)?;

        loop {
            match event::read()? {
                event::Event::Key(key) => match self.mapper.map(&key) {
                    Some(Intent::Quit) => break,
                    Some(Intent::Forward) => {
                        let before = self.sequencer.surface().cells().to_vec();
                        if self.sequencer.advance()? {
                            self.render_diff(stdout, &before)?;
                            self.render_status(stdout)?;
                        }
                    }
                    Some(Intent::Backward) => {
                        if self.sequencer.retreat()? {
                            self.render_full(stdout)?;
                            self.render_status(stdout)?;
                        }
                    }
                    None => debug!(?key, "unbound key"),
                },
                event::Event::Resize(_, _) => {
                    queue!(stdout, terminal::Clear(terminal::ClearType::All))?;
                    self.render_menubar(stdout)?;
                    self.render_full(stdout)?;
                    self.render_status(stdout)?;
                }
                _ => {}
            }
        }

        Ok(())
    }

    // -----------------------------------------------------------------------
    // Terminal output
    // -----------------------------------------------------------------------

    fn render_menubar(&self, stdout: &mut io::Stdout) -> Result<()> {
        let items = self.mapper.bindings().menu_items();

        queue!(
            stdout,
            cursor::MoveTo(0, 0),
            terminal::Clear(terminal::ClearType::CurrentLine),
            style::Print(" "),
        )?;
        for (i, item) in items.iter().enumerate() {
            if i > 0 {
                queue!(stdout, style::Print("  "))?;
            }
            print_menu_item(stdout, item)?;
        }
        stdout.flush()?;
        Ok(())
    }

    fn render_full(&self, stdout: &mut io::Stdout) -> Result<()> {
        for (y, row) in self.sequencer.surface().cells().iter().enumerate() {
            queue!(stdout, cursor::MoveTo(0, y as u16 + CANVAS_OFFSET))?;
            for cell in row {
                print_cell(stdout, cell)?;
            }
        }
        stdout.flush()?;
        Ok(())
    }

    fn render_diff(&self, stdout: &mut io::Stdout, before: &[Vec<Cell>]) -> Result<()> {
        for change in self.sequencer.surface().diff(before) {
            queue!(stdout, cursor::MoveTo(change.x, change.y + CANVAS_OFFSET))?;
            print_cell(stdout, &change.cell)?;
        }
        stdout.flush()?;
        Ok(())
    }

    fn render_status(&self, stdout: &mut io::Stdout) -> Result<()> {
        let status_y = self.sequencer.surface().height() + CANVAS_OFFSET;
        let (_, term_h) = terminal::size()?;
        if status_y >= term_h {
            return Ok(()); // No room for status bar.
        }

        let status = status_line(&self.sequencer, self.mapper.bindings());

        let mut cs = style::ContentStyle::default();
        cs.attributes.set(style::Attribute::Dim);

        queue!(
            stdout,
            cursor::MoveTo(0, status_y),
            terminal::Clear(terminal::ClearType::CurrentLine),
            style::PrintStyledContent(style::StyledContent::new(cs, status)),
        )?;
        stdout.flush()?;
        Ok(())
    }
}

/// Status bar text: position, label of the last applied step, base seed
/// and a key hint.
pub fn status_line<S, P>(sequencer: &Sequencer<S, P>, keys: &KeyBindings) -> String {
    let cursor = sequencer.cursor();
    let label = cursor
        .checked_sub(1)
        .and_then(|last| sequencer.catalog().label(last))
        .map(|label| format!(" {label} |"))
        .unwrap_or_default();
    let hint = keys.hint();
    let hint = if hint.is_empty() { String::new() } else { format!(" | {hint}") };
    format!(
        " Step {}/{} |{} seed {}{} ",
        cursor,
        sequencer.len(),
        label,
        sequencer.base_seed(),
        hint,
    )
}

fn print_cell(stdout: &mut io::Stdout, cell: &Cell) -> Result<()> {
    let cs = to_content_style(&cell.style);
    queue!(
        stdout,
        style::PrintStyledContent(style::StyledContent::new(cs, cell.ch))
    )?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Style conversion
// ---------------------------------------------------------------------------

pub fn to_content_style(s: &Style) -> style::ContentStyle {
    let mut cs = style::ContentStyle::default();
    if let Some(fg) = &s.fg {
        cs.foreground_color = Some(to_ct_color(fg));
    }
    if let Some(bg) = &s.bg {
        cs.background_color = Some(to_ct_color(bg));
    }
    if s.bold {
        cs.attributes.set(style::Attribute::Bold);
    }
    if s.dim {
        cs.attributes.set(style::Attribute::Dim);
    }
    cs
}

pub fn to_ct_color(c: &Color) -> style::Color {
    match c {
        Color::Named(n) => match n {
            NamedColor::Black => style::Color::Black,
            NamedColor::Red => style::Color::Red,
            NamedColor::Green => style::Color::Green,
            NamedColor::Yellow => style::Color::Yellow,
            NamedColor::Blue => style::Color::Blue,
            NamedColor::Magenta => style::Color::Magenta,
            NamedColor::Cyan => style::Color::Cyan,
            NamedColor::White => style::Color::White,
        },
        Color::Rgb { r, g, b } => style::Color::Rgb {
            r: *r,
            g: *g,
            b: *b,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;
    use crate::deck::builtin;
    use crate::position::MemoryPublisher;

    #[test]
    fn status_shows_position_label_and_seed() {
        let deck = builtin::git_areas();
        let mut seq = Sequencer::new(
            deck.catalog(),
            CellCanvas::new(deck.width, deck.height),
            MemoryPublisher::new(),
            31,
        );
        assert_eq!(
            status_line(&seq, &KeyBindings::default()),
            " Step 0/5 | seed 31 | \u{2190}\u{2192}: navigate | q: quit "
        );
        seq.fast_forward(3).unwrap();
        assert_eq!(
            status_line(&seq, &KeyBindings::default()),
            " Step 3/5 | workdir | seed 31 | \u{2190}\u{2192}: navigate | q: quit "
        );
    }

    #[test]
    fn status_without_labels() {
        let seq = Sequencer::new(Catalog::empty(), CellCanvas::new(1, 1), MemoryPublisher::new(), 0);
        assert!(status_line(&seq, &KeyBindings::default()).starts_with(" Step 0/0 | seed 0 |"));
    }

    #[test]
    fn status_hint_follows_bindings() {
        let seq = Sequencer::new(Catalog::empty(), CellCanvas::new(1, 1), MemoryPublisher::new(), 4);
        let keys = KeyBindings {
            forward: vec!["n".into()],
            backward: vec!["p".into()],
            quit: vec!["Ctrl-c".into()],
        };
        assert_eq!(
            status_line(&seq, &keys),
            " Step 0/0 | seed 4 | pn: navigate | Ctrl-c: quit "
        );

        let unbound = KeyBindings {
            forward: Vec::new(),
            backward: Vec::new(),
            quit: Vec::new(),
        };
        assert_eq!(status_line(&seq, &unbound), " Step 0/0 | seed 4 ");
    }

    #[test]
    fn style_conversion() {
        let cs = to_content_style(&Style {
            fg: Some(Color::Named(NamedColor::Cyan)),
            bold: true,
            ..Default::default()
        });
        assert_eq!(cs.foreground_color, Some(style::Color::Cyan));
        assert!(cs.attributes.has(style::Attribute::Bold));
        assert_eq!(
            to_ct_color(&Color::Rgb { r: 1, g: 2, b: 3 }),
            style::Color::Rgb { r: 1, g: 2, b: 3 }
        );
    }
}
