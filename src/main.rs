// Copyright (c) 2026 rezky_nightky

mod cell;
mod chat;
mod config;
mod frame;
mod glyphs;
mod palette;
mod runtime;
mod scene;
mod scheduler;
mod sky;
mod terminal;

use std::env;
use std::time::{Duration, Instant};

#[cfg(unix)]
use std::thread;

use clap::builder::styling::{AnsiColor as ClapAnsiColor, Color as ClapColor};
use clap::builder::styling::{Effects as ClapEffects, Style as ClapStyle};
use clap::builder::Styles as ClapStyles;
use clap::{CommandFactory, FromArgMatches};
use crossterm::event::{Event, KeyCode, KeyEventKind, KeyModifiers};
use rand::rngs::StdRng;
use rand::SeedableRng;

#[cfg(unix)]
use signal_hook::consts::{SIGHUP, SIGINT, SIGTERM};
#[cfg(unix)]
use signal_hook::iterator::Signals;

use crate::chat::Chat;
use crate::config::{
    color_enabled_stdout, default_params_usage_for_help, print_help_detail, print_list_colors,
    print_list_topics, Args,
};
use crate::frame::Frame;
use crate::runtime::{ColorMode, ColorScheme, GlyphMode};
use crate::scene::Scene;
use crate::sky::{generate_population, SpawnCounts};
use crate::terminal::{restore_terminal_best_effort, Terminal};

const HELP_TEMPLATE_PLAIN: &str = "\
{before-help}{about-with-newline}
USAGE:
  {usage}

{all-args}{after-help}";

const HELP_TEMPLATE_COLOR: &str = "\
{before-help}{about-with-newline}
\x1b[1;36mUSAGE:\x1b[0m
  {usage}

{all-args}{after-help}";

/// How long one event-poll pass may block before the loop checks the
/// drift channel and the reply clock again.
const POLL_SLICE: Duration = Duration::from_millis(10);

fn build_info() -> &'static str {
    env!("SPIRITGLADE_BUILD")
}

fn clap_styles() -> ClapStyles {
    ClapStyles::styled()
        .header(
            ClapStyle::new()
                .effects(ClapEffects::BOLD)
                .fg_color(Some(ClapColor::Ansi(ClapAnsiColor::Cyan))),
        )
        .usage(
            ClapStyle::new()
                .effects(ClapEffects::BOLD)
                .fg_color(Some(ClapColor::Ansi(ClapAnsiColor::Green))),
        )
        .literal(ClapStyle::new().fg_color(Some(ClapColor::Ansi(ClapAnsiColor::Yellow))))
        .placeholder(ClapStyle::new().fg_color(Some(ClapColor::Ansi(ClapAnsiColor::Magenta))))
}

fn require_u64_range(name: &str, v: u64, min: u64, max: u64) -> u64 {
    if v < min || v > max {
        eprintln!("failed to apply {} {} (min {} max {})", name, v, min, max);
        std::process::exit(1);
    }
    v
}

fn require_u16_range(name: &str, v: u16, min: u16, max: u16) -> u16 {
    if v < min || v > max {
        eprintln!("failed to apply {} {} (min {} max {})", name, v, min, max);
        std::process::exit(1);
    }
    v
}

fn default_to_ascii() -> bool {
    let lang = env::var("LANG").unwrap_or_default();
    !lang.to_ascii_uppercase().contains("UTF")
}

fn detect_color_mode_auto() -> ColorMode {
    let colorterm = env::var("COLORTERM")
        .unwrap_or_default()
        .to_ascii_lowercase();
    if colorterm.contains("truecolor") || colorterm.contains("24bit") {
        return ColorMode::TrueColor;
    }

    let term = env::var("TERM").unwrap_or_default().to_ascii_lowercase();
    if term == "dumb" {
        return ColorMode::Mono;
    }

    ColorMode::Color256
}

fn detect_color_mode(args: &Args) -> ColorMode {
    if let Some(m) = args.colormode {
        return match m {
            0 => ColorMode::Mono,
            8 => ColorMode::Color256,
            24 => ColorMode::TrueColor,
            _ => {
                eprintln!("invalid --colormode: {} (allowed: 0,8,24)", m);
                std::process::exit(1);
            }
        };
    }

    detect_color_mode_auto()
}

fn color_mode_label(m: ColorMode) -> &'static str {
    match m {
        ColorMode::TrueColor => "24-bit truecolor",
        ColorMode::Color256 => "8-bit (256-color)",
        ColorMode::Mono => "mono",
        ColorMode::Color16 => "16-color",
    }
}

fn parse_color_scheme(s: &str) -> Result<ColorScheme, String> {
    match s.trim().to_ascii_lowercase().as_str() {
        "meadow" | "forest" | "glade" => Ok(ColorScheme::Meadow),
        "dusk" | "sunset" => Ok(ColorScheme::Dusk),
        "ocean" | "sea" => Ok(ColorScheme::Ocean),
        "sakura" | "blossom" => Ok(ColorScheme::Sakura),
        "night" | "moon" => Ok(ColorScheme::Night),
        "mono" | "none" => Ok(ColorScheme::Mono),
        _ => Err(format!("invalid color: {} (see --list-colors)", s)),
    }
}

fn main() -> std::io::Result<()> {
    std::panic::set_hook(Box::new(|info| {
        restore_terminal_best_effort();
        eprintln!("{}", info);
    }));

    #[cfg(unix)]
    {
        if let Ok(mut signals) = Signals::new([SIGINT, SIGTERM, SIGHUP]) {
            thread::spawn(move || {
                if let Some(sig) = signals.forever().next() {
                    restore_terminal_best_effort();
                    std::process::exit(128 + sig);
                }
            });
        }
    }

    #[cfg(windows)]
    {
        if let Err(e) = ctrlc::set_handler(|| {
            restore_terminal_best_effort();
            std::process::exit(130);
        }) {
            eprintln!("failed to install Ctrl-C handler: {}", e);
        }
    }

    let mut cmd = Args::command();
    cmd = cmd.styles(clap_styles());
    cmd = cmd.before_help(default_params_usage_for_help());
    let help_template = if color_enabled_stdout() {
        HELP_TEMPLATE_COLOR
    } else {
        HELP_TEMPLATE_PLAIN
    };
    cmd = cmd.help_template(help_template);
    cmd.build();

    if cmd.get_arguments().any(|a| a.get_id().as_str() == "help") {
        cmd = cmd.mut_arg("help", |a| a.help_heading("HELP"));
    }
    cmd.build();

    let matches = cmd.get_matches();
    let args = Args::from_arg_matches(&matches).unwrap_or_else(|e| e.exit());

    if args.list_colors {
        print_list_colors();
        return Ok(());
    }

    if args.list_topics {
        print_list_topics();
        return Ok(());
    }

    if args.help_detail {
        print_help_detail();
        return Ok(());
    }

    if args.check_bitcolor {
        let colorterm = env::var("COLORTERM").unwrap_or_default();
        let term = env::var("TERM").unwrap_or_default();
        let auto = detect_color_mode_auto();
        let effective = detect_color_mode(&args);

        println!("BITCOLOR CHECK:");
        println!(
            "  COLORTERM: {}",
            if colorterm.is_empty() {
                "(unset)"
            } else {
                &colorterm
            }
        );
        println!(
            "  TERM: {}",
            if term.is_empty() { "(unset)" } else { &term }
        );
        println!("  auto_detected: {}", color_mode_label(auto));
        if args.colormode.is_some() {
            println!("  forced: {}", color_mode_label(effective));
        }
        println!("  effective: {}", color_mode_label(effective));
        return Ok(());
    }

    if args.version {
        println!("{} {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));
        return Ok(());
    }

    if args.info {
        println!("Version: v{}", env!("CARGO_PKG_VERSION"));
        println!("Build: {}", build_info());
        println!("Copyright: (c) 2026 {}", env!("CARGO_PKG_AUTHORS"));
        println!("License: {}", env!("CARGO_PKG_LICENSE"));
        println!("Source: {}", env!("CARGO_PKG_REPOSITORY"));
        return Ok(());
    }

    let tick_ms = require_u64_range("--tick", args.tick_ms, 10, 1000);
    let counts = SpawnCounts {
        clouds: require_u16_range("--clouds", args.clouds, 0, 100),
        leaves: require_u16_range("--leaves", args.leaves, 0, 100),
        dust: require_u16_range("--dust", args.dust, 0, 100),
    };

    let color_scheme = match parse_color_scheme(&args.color) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(1);
        }
    };

    let color_mode = detect_color_mode(&args);
    let glyph_mode = if args.ascii || default_to_ascii() {
        GlyphMode::Ascii
    } else {
        GlyphMode::Unicode
    };

    let mut rng = match args.seed {
        Some(s) => StdRng::seed_from_u64(s),
        None => StdRng::from_os_rng(),
    };
    let population = generate_population(counts, &mut rng);

    let scene = Scene::new(
        palette::build_palette(color_scheme, color_mode, args.color_bg),
        glyph_mode,
    );

    let mut term = Terminal::new()?;
    let (w, h) = term.size()?;
    let mut frame = Frame::new(w, h, scene.palette.bg);

    let mut chat = Chat::new();
    let mut sky_now = population.clone();

    let mut drift = if args.no_drift {
        None
    } else {
        let (handle, rx) = scheduler::start(population, Duration::from_millis(tick_ms))?;
        Some((handle, rx))
    };

    let mut running = true;
    while running {
        let mut pending_resize: Option<(u16, u16)> = None;

        if Terminal::poll_event(POLL_SLICE)? {
            loop {
                match Terminal::read_event()? {
                    Event::Resize(nw, nh) => {
                        pending_resize = Some((nw, nh));
                    }
                    Event::Key(k) if k.kind == KeyEventKind::Press => {
                        match (k.code, k.modifiers) {
                            (KeyCode::Esc, _) => running = false,
                            (KeyCode::Char('q'), _) => running = false,
                            (KeyCode::Char('c'), KeyModifiers::CONTROL) => running = false,
                            (KeyCode::Char(c @ '1'..='4'), _) => {
                                let idx = c as usize - '1' as usize;
                                chat.select_topic(idx, Instant::now());
                            }
                            _ => {}
                        }
                    }
                    _ => {}
                }
                if !Terminal::poll_event(Duration::from_millis(0))? {
                    break;
                }
            }
        }

        if !running {
            break;
        }

        if let Some((nw, nh)) = pending_resize {
            frame = Frame::new(nw, nh, scene.palette.bg);
        }

        chat.poll(Instant::now());

        let mut sky_moved = false;
        if let Some((_, rx)) = &drift {
            for snapshot in rx.try_iter() {
                sky_now = snapshot;
                sky_moved = true;
            }
        }

        if sky_moved || chat.take_changed() || pending_resize.is_some() || frame.is_dirty_all() {
            scene.render(&mut frame, &sky_now, &chat);
            if frame.has_changes() {
                term.draw(&mut frame)?;
            }
        }
    }

    if let Some((mut handle, _)) = drift.take() {
        handle.stop();
    }

    Ok(())
}
