// Copyright (c) 2026 rezky_nightky

use std::io::{stdout, Result, Stdout, Write};

use crossterm::{
    cursor, event,
    style::{
        Attribute, Color, Print, ResetColor, SetAttribute, SetBackgroundColor, SetForegroundColor,
    },
    terminal, ExecutableCommand, QueueableCommand,
};

use crate::frame::Frame;

/// Raw-mode alternate-screen session. The frame's dirty list is the
/// diff against what is already on screen (one frame instance per
/// session, cleared after every draw), so no shadow copy is kept here.
pub struct Terminal {
    stdout: Stdout,
    fg: Option<Color>,
    bg: Option<Color>,
    bold: bool,
    dim: bool,
    run: String,
}

impl Terminal {
    pub fn new() -> Result<Self> {
        let mut out = stdout();
        terminal::enable_raw_mode()?;
        let init: Result<()> = (|| {
            out.execute(terminal::EnterAlternateScreen)?;
            out.execute(cursor::Hide)?;
            let _ = out.execute(terminal::DisableLineWrap);
            out.execute(SetAttribute(Attribute::Reset))?;
            out.execute(ResetColor)?;
            out.execute(terminal::Clear(terminal::ClearType::All))?;
            out.flush()?;
            Ok(())
        })();
        if let Err(e) = init {
            restore_terminal_best_effort();
            return Err(e);
        }
        Ok(Self {
            stdout: out,
            fg: None,
            bg: None,
            bold: false,
            dim: false,
            run: String::with_capacity(64),
        })
    }

    pub fn size(&self) -> Result<(u16, u16)> {
        terminal::size()
    }

    pub fn poll_event(timeout: std::time::Duration) -> Result<bool> {
        event::poll(timeout)
    }

    pub fn read_event() -> Result<event::Event> {
        event::read()
    }

    fn apply_style(
        &mut self,
        fg: Option<Color>,
        bg: Option<Color>,
        bold: bool,
        dim: bool,
    ) -> Result<()> {
        if fg != self.fg {
            self.stdout
                .queue(SetForegroundColor(fg.unwrap_or(Color::Reset)))?;
            self.fg = fg;
        }
        if bg != self.bg {
            self.stdout
                .queue(SetBackgroundColor(bg.unwrap_or(Color::Reset)))?;
            self.bg = bg;
        }
        if bold != self.bold || dim != self.dim {
            // NormalIntensity clears both, then re-add what is wanted.
            self.stdout.queue(SetAttribute(Attribute::NormalIntensity))?;
            if bold {
                self.stdout.queue(SetAttribute(Attribute::Bold))?;
            }
            if dim {
                self.stdout.queue(SetAttribute(Attribute::Dim))?;
            }
            self.bold = bold;
            self.dim = dim;
        }
        Ok(())
    }

    pub fn draw(&mut self, frame: &mut Frame) -> Result<()> {
        if frame.is_dirty_all() {
            self.stdout
                .queue(terminal::Clear(terminal::ClearType::All))?;
            for y in 0..frame.height {
                self.stdout.queue(cursor::MoveTo(0, y))?;
                for x in 0..frame.width {
                    let idx = y as usize * frame.width as usize + x as usize;
                    let cell = frame.cell_at_index(idx);
                    self.apply_style(cell.fg, cell.bg, cell.bold, cell.dim)?;
                    self.stdout.queue(Print(cell.ch))?;
                }
            }
            self.finish(frame)?;
            return Ok(());
        }

        let mut dirty = frame.dirty_indices().to_vec();
        dirty.sort_unstable();

        let width = frame.width as usize;
        let mut i = 0usize;
        while i < dirty.len() {
            let start = dirty[i];
            let cell = frame.cell_at_index(start);
            let y = (start / width) as u16;
            let x = (start % width) as u16;

            // Batch consecutive same-style cells on one row into a
            // single Print.
            let mut run = std::mem::take(&mut self.run);
            run.clear();
            run.push(cell.ch);
            let mut prev = start;
            let mut j = i + 1;
            while j < dirty.len() {
                let idx = dirty[j];
                if idx != prev + 1 || idx / width != start / width {
                    break;
                }
                let next = frame.cell_at_index(idx);
                if next.fg != cell.fg
                    || next.bg != cell.bg
                    || next.bold != cell.bold
                    || next.dim != cell.dim
                {
                    break;
                }
                run.push(next.ch);
                prev = idx;
                j += 1;
            }

            self.stdout.queue(cursor::MoveTo(x, y))?;
            self.apply_style(cell.fg, cell.bg, cell.bold, cell.dim)?;
            self.stdout.queue(Print(run.as_str()))?;
            self.run = run;
            i = j;
        }

        self.finish(frame)
    }

    fn finish(&mut self, frame: &mut Frame) -> Result<()> {
        self.stdout.queue(SetAttribute(Attribute::Reset))?;
        self.stdout.queue(ResetColor)?;
        self.fg = None;
        self.bg = None;
        self.bold = false;
        self.dim = false;
        self.stdout.flush()?;
        frame.clear_dirty();
        Ok(())
    }
}

impl Drop for Terminal {
    fn drop(&mut self) {
        restore_terminal_best_effort();
    }
}

pub fn restore_terminal_best_effort() {
    let mut out = stdout();
    let _ = out.execute(SetAttribute(Attribute::Reset));
    let _ = out.execute(ResetColor);
    let _ = out.execute(cursor::Show);
    let _ = out.execute(terminal::EnableLineWrap);
    let _ = out.execute(terminal::LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();
    let _ = out.flush();
}
