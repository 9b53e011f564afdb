// Copyright (c) 2026 rezky_nightky

use crate::cell::Cell;
use crate::chat::{Chat, Role, TOPICS};
use crate::frame::Frame;
use crate::glyphs;
use crate::palette::Palette;
use crate::runtime::GlyphMode;
use crate::sky::{Kind, Particle};

pub const TITLE: &str = "Crypto Spirit Guide";
pub const SUBTITLE: &str = "Wisdom from the digital forest";

const MIN_COLS: u16 = 30;
const MIN_LINES: u16 = 12;

/// Widest the chat column gets; wider terminals keep it centered.
const PANEL_MAX_W: u16 = 80;

pub struct Scene {
    pub palette: Palette,
    pub glyphs: GlyphMode,
}

/// Map percent-of-view coordinates onto the cell grid. Returns None for
/// positions above or below the visible rows.
fn cell_pos(x: f32, y: f32, width: u16, height: u16) -> Option<(u16, u16)> {
    if y < 0.0 || y >= 100.0 || width == 0 || height == 0 {
        return None;
    }
    let row = ((y / 100.0) * height as f32) as u16;
    if row >= height {
        return None;
    }
    let col = (((x / 100.0) * width as f32) as u16).min(width.saturating_sub(1));
    Some((col, row))
}

/// Greedy word wrap; words longer than the line are hard-broken.
pub fn wrap(text: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut out = Vec::new();
    let mut line = String::new();

    for word in text.split_whitespace() {
        let mut word = word;
        loop {
            let need = if line.is_empty() {
                word.chars().count()
            } else {
                line.chars().count() + 1 + word.chars().count()
            };
            if need <= width {
                if !line.is_empty() {
                    line.push(' ');
                }
                line.push_str(word);
                break;
            }
            if line.is_empty() {
                let cut: String = word.chars().take(width).collect();
                word = &word[cut.len()..];
                out.push(cut);
                continue;
            }
            out.push(std::mem::take(&mut line));
        }
    }
    if !line.is_empty() {
        out.push(line);
    }
    if out.is_empty() {
        out.push(String::new());
    }
    out
}

struct DisplayLine {
    text: String,
    role: Role,
    blank: bool,
}

impl Scene {
    pub fn new(palette: Palette, glyphs: GlyphMode) -> Self {
        Self { palette, glyphs }
    }

    /// Repaint the whole scene into `frame`. Every cell is written each
    /// pass; the frame dedupes, so only what actually moved gets drawn.
    pub fn render(&self, frame: &mut Frame, particles: &[Particle], chat: &Chat) {
        let blank = Cell::blank_with_bg(self.palette.bg);
        for y in 0..frame.height {
            for x in 0..frame.width {
                frame.set(x, y, blank);
            }
        }

        self.draw_backdrop(frame, particles);

        if frame.width < MIN_COLS || frame.height < MIN_LINES {
            let notice = "window too small";
            let x = frame.width.saturating_sub(notice.len() as u16) / 2;
            let style = Cell {
                fg: self.palette.text,
                ..blank
            };
            frame.put_str(x, frame.height / 2, notice, style);
            return;
        }

        self.draw_header(frame);
        self.draw_chat_panel(frame, chat);
        self.draw_topic_bar(frame);
    }

    fn draw_backdrop(&self, frame: &mut Frame, particles: &[Particle]) {
        let bg = self.palette.bg;
        for p in particles {
            let Some((col, row)) = cell_pos(p.x, p.y, frame.width, frame.height) else {
                continue;
            };
            match p.kind {
                Kind::Cloud => {
                    let shade = self
                        .palette
                        .cloud
                        .get(p.id as usize % self.palette.cloud.len().max(1))
                        .copied();
                    let run = glyphs::cloud_run_width(p.size);
                    for i in 0..run {
                        let ch = if i == 0 || i + 1 == run {
                            glyphs::cloud_fringe(self.glyphs)
                        } else {
                            glyphs::cloud_body(self.glyphs)
                        };
                        frame.set(col.saturating_add(i), row, Cell::glyph(ch, shade, bg));
                    }
                }
                Kind::Leaf => {
                    let shade = self
                        .palette
                        .leaf
                        .get(p.id as usize % self.palette.leaf.len().max(1))
                        .copied();
                    let mut cell =
                        Cell::glyph(glyphs::leaf_glyph(p.rotation, self.glyphs), shade, bg);
                    cell.bold = p.size >= 12.0;
                    frame.set(col, row, cell);
                }
                Kind::Dust => {
                    let shade = self
                        .palette
                        .dust
                        .get(p.id as usize % self.palette.dust.len().max(1))
                        .copied();
                    let mut cell =
                        Cell::glyph(glyphs::dust_glyph(p.size, self.glyphs), shade, bg);
                    cell.dim = true;
                    frame.set(col, row, cell);
                }
            }
        }
    }

    fn draw_header(&self, frame: &mut Frame) {
        let blank = Cell::blank_with_bg(self.palette.bg);
        let title_x = frame.width.saturating_sub(TITLE.len() as u16) / 2;
        let mut style = Cell {
            fg: self.palette.title,
            ..blank
        };
        style.bold = true;
        frame.put_str(title_x, 1, TITLE, style);

        let sub_x = frame.width.saturating_sub(SUBTITLE.len() as u16) / 2;
        frame.put_str(
            sub_x,
            2,
            SUBTITLE,
            Cell {
                fg: self.palette.subtitle,
                ..blank
            },
        );
    }

    fn panel_rect(&self, frame: &Frame) -> (u16, u16, u16, u16) {
        let w = frame.width.saturating_sub(4).min(PANEL_MAX_W);
        let x = (frame.width - w) / 2;
        let y = 4u16;
        // Three rows of topic bar plus a margin row below the panel.
        let h = frame.height.saturating_sub(y + 4);
        (x, y, w, h)
    }

    fn border_chars(&self) -> (char, char, char, char, char, char) {
        match self.glyphs {
            GlyphMode::Unicode => ('┌', '┐', '└', '┘', '─', '│'),
            GlyphMode::Ascii => ('+', '+', '+', '+', '-', '|'),
        }
    }

    fn draw_chat_panel(&self, frame: &mut Frame, chat: &Chat) {
        let (px, py, pw, ph) = self.panel_rect(frame);
        if pw < 8 || ph < 3 {
            return;
        }

        let blank = Cell::blank_with_bg(self.palette.bg);
        let border = Cell {
            fg: self.palette.border,
            ..blank
        };
        let (tl, tr, bl, br, hline, vline) = self.border_chars();

        for x in 0..pw {
            let ch = match x {
                0 => tl,
                _ if x + 1 == pw => tr,
                _ => hline,
            };
            frame.set(px + x, py, Cell { ch, ..border });
            let ch = match x {
                0 => bl,
                _ if x + 1 == pw => br,
                _ => hline,
            };
            frame.set(px + x, py + ph - 1, Cell { ch, ..border });
        }
        for y in 1..ph.saturating_sub(1) {
            frame.set(px, py + y, Cell { ch: vline, ..border });
            frame.set(px + pw - 1, py + y, Cell { ch: vline, ..border });
            // Panel interior sits on top of the backdrop.
            for x in 1..pw.saturating_sub(1) {
                frame.set(px + x, py + y, blank);
            }
        }

        let inner_x = px + 2;
        let inner_w = pw.saturating_sub(4) as usize;
        let inner_h = ph.saturating_sub(2) as usize;
        if inner_w == 0 || inner_h == 0 {
            return;
        }

        let lines = self.layout_messages(chat, inner_w);
        let skip = lines.len().saturating_sub(inner_h);
        for (i, dl) in lines[skip..].iter().enumerate() {
            if dl.blank {
                continue;
            }
            let y = py + 1 + i as u16;
            let (x, fg) = match dl.role {
                Role::User => {
                    let len = dl.text.chars().count().min(inner_w) as u16;
                    (inner_x + inner_w as u16 - len, self.palette.user)
                }
                Role::Assistant => (inner_x, self.palette.assistant),
            };
            frame.put_str(x, y, &dl.text, Cell { fg, ..blank });
        }
    }

    fn layout_messages(&self, chat: &Chat, inner_w: usize) -> Vec<DisplayLine> {
        // Bubbles take at most 80% of the panel so the two sides stay
        // visually distinct.
        let bubble_w = (inner_w * 4 / 5).max(8);
        let mut out: Vec<DisplayLine> = Vec::new();

        for (i, m) in chat.messages().iter().enumerate() {
            if i > 0 {
                out.push(DisplayLine {
                    text: String::new(),
                    role: m.role,
                    blank: true,
                });
            }
            for l in wrap(&m.content, bubble_w) {
                out.push(DisplayLine {
                    text: l,
                    role: m.role,
                    blank: false,
                });
            }
        }

        if chat.reply_pending() {
            out.push(DisplayLine {
                text: String::new(),
                role: Role::Assistant,
                blank: true,
            });
            out.push(DisplayLine {
                text: "...".to_string(),
                role: Role::Assistant,
                blank: false,
            });
        }

        out
    }

    fn draw_topic_bar(&self, frame: &mut Frame) {
        let (px, _, pw, _) = self.panel_rect(frame);
        let blank = Cell::blank_with_bg(self.palette.bg);
        let bar_y = frame.height.saturating_sub(4);
        let col_w = pw / 2;

        for (i, topic) in TOPICS.iter().enumerate() {
            let y = bar_y + (i as u16 / 2);
            let x = px + (i as u16 % 2) * col_w;

            let tag = format!("[{}] ", topic.key);
            let mut key_style = Cell {
                fg: self.palette.key,
                ..blank
            };
            key_style.bold = true;
            frame.put_str(x, y, &tag, key_style);

            let label_x = x + tag.len() as u16;
            let room = col_w.saturating_sub(tag.len() as u16 + 1) as usize;
            let label: String = topic.label.chars().take(room).collect();
            frame.put_str(
                label_x,
                y,
                &label,
                Cell {
                    fg: self.palette.text,
                    ..blank
                },
            );
        }

        let help = "1-4 ask | q quit";
        let x = frame.width.saturating_sub(help.len() as u16) / 2;
        let mut style = Cell {
            fg: self.palette.subtitle,
            ..blank
        };
        style.dim = true;
        frame.put_str(x, frame.height.saturating_sub(1), help, style);
    }
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;
    use crate::config::ColorBg;
    use crate::palette::build_palette;
    use crate::runtime::{ColorMode, ColorScheme};
    use crate::sky::{generate_population, SpawnCounts};

    fn test_scene() -> Scene {
        Scene::new(
            build_palette(ColorScheme::Meadow, ColorMode::TrueColor, ColorBg::Themed),
            GlyphMode::Ascii,
        )
    }

    fn row_text(frame: &Frame, y: u16) -> String {
        (0..frame.width)
            .map(|x| frame.get(x, y).unwrap().ch)
            .collect()
    }

    #[test]
    fn wrap_splits_on_words_and_hard_breaks_long_ones() {
        assert_eq!(wrap("a b c", 3), vec!["a b", "c"]);
        assert_eq!(wrap("hello world", 20), vec!["hello world"]);
        assert_eq!(wrap("abcdefgh", 3), vec!["abc", "def", "gh"]);
        assert_eq!(wrap("", 10), vec![""]);
    }

    #[test]
    fn offscreen_particles_have_no_cell() {
        assert_eq!(cell_pos(50.0, -10.0, 80, 24), None);
        assert_eq!(cell_pos(50.0, 105.0, 80, 24), None);
        assert_eq!(cell_pos(50.0, 100.0, 80, 24), None);
        assert_eq!(cell_pos(0.0, 0.0, 80, 24), Some((0, 0)));
        assert_eq!(cell_pos(99.9, 99.9, 80, 24), Some((79, 23)));
    }

    #[test]
    fn render_places_title_panel_and_topics() {
        let scene = test_scene();
        let mut frame = Frame::new(80, 24, scene.palette.bg);
        let mut rng = StdRng::seed_from_u64(9);
        let particles = generate_population(SpawnCounts::default(), &mut rng);
        let chat = Chat::new();

        scene.render(&mut frame, &particles, &chat);

        assert!(row_text(&frame, 1).contains(TITLE));
        assert!(row_text(&frame, 2).contains(SUBTITLE));
        assert!(row_text(&frame, 4).contains('+'));
        assert!(row_text(&frame, 20).contains("[1] What is Bitcoin?"));
        assert!(row_text(&frame, 21).contains("[3] Crypto risks"));
        // Greeting starts inside the panel.
        assert!(row_text(&frame, 5).contains("Hello!"));
    }

    #[test]
    fn tiny_window_shows_a_notice_instead_of_the_chat() {
        let scene = test_scene();
        let mut frame = Frame::new(20, 6, scene.palette.bg);
        let chat = Chat::new();

        scene.render(&mut frame, &[], &chat);

        assert!(row_text(&frame, 3).contains("window too small"));
    }
}
