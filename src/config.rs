// Copyright (c) 2026 rezky_nightky

use std::io::IsTerminal;

use clap::Parser;

use crate::chat::TOPICS;

pub const DEFAULT_PARAMS_USAGE: &str = "DEFAULT PARAMS USAGE:\n  spiritglade --tick 50 --clouds 5 --leaves 10 --dust 15 --color meadow --color-bg themed";

pub fn color_enabled_stdout() -> bool {
    if std::env::var_os("NO_COLOR").is_some() {
        return false;
    }
    if matches!(std::env::var("CLICOLOR").ok().as_deref(), Some("0")) {
        return false;
    }
    std::io::stdout().is_terminal()
}

fn colorize_help_detail(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 64);
    for chunk in text.split_inclusive('\n') {
        let (line, nl) = chunk
            .strip_suffix('\n')
            .map(|l| (l, "\n"))
            .unwrap_or((chunk, ""));

        let is_heading =
            !line.starts_with(' ') && line.ends_with(':') && line == line.to_ascii_uppercase();

        if is_heading {
            out.push_str("\x1b[1;36m");
            out.push_str(line);
            out.push_str("\x1b[0m");
            out.push_str(nl);
            continue;
        }

        if let Some(rest) = line.strip_prefix("      Example:") {
            out.push_str("      \x1b[32mExample:\x1b[0m");
            out.push_str(rest);
            out.push_str(nl);
            continue;
        }

        if let Some(rest) = line.strip_prefix("  spiritglade") {
            out.push_str("  \x1b[1;34mspiritglade\x1b[0m");
            out.push_str(rest);
            out.push_str(nl);
            continue;
        }

        if let Some(rest) = line.strip_prefix("  -") {
            out.push_str("  \x1b[33m-");
            out.push_str(rest);
            out.push_str("\x1b[0m");
            out.push_str(nl);
            continue;
        }

        out.push_str(line);
        out.push_str(nl);
    }
    out
}

pub fn default_params_usage_for_help() -> String {
    if color_enabled_stdout() {
        colorize_help_detail(DEFAULT_PARAMS_USAGE)
    } else {
        DEFAULT_PARAMS_USAGE.to_string()
    }
}

#[derive(clap::ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorBg {
    #[value(name = "black")]
    Black,
    #[value(name = "themed")]
    Themed,
    #[value(name = "transparent")]
    Transparent,
}

#[derive(Parser, Debug, Clone)]
#[command(name = "spiritglade", version, disable_version_flag = true)]
pub struct Args {
    #[arg(
        short = 't',
        long = "tick",
        default_value_t = 50,
        help_heading = "BACKDROP",
        help = "Drift tick interval in ms (min 10 max 1000)"
    )]
    pub tick_ms: u64,

    #[arg(
        long = "clouds",
        default_value_t = 5,
        help_heading = "BACKDROP",
        help = "Number of clouds (min 0 max 100)"
    )]
    pub clouds: u16,

    #[arg(
        long = "leaves",
        default_value_t = 10,
        help_heading = "BACKDROP",
        help = "Number of leaves (min 0 max 100)"
    )]
    pub leaves: u16,

    #[arg(
        long = "dust",
        default_value_t = 15,
        help_heading = "BACKDROP",
        help = "Number of dust motes (min 0 max 100)"
    )]
    pub dust: u16,

    #[arg(
        long = "seed",
        help_heading = "BACKDROP",
        help = "Seed the backdrop generation for a reproducible sky"
    )]
    pub seed: Option<u64>,

    #[arg(
        long = "no-drift",
        help_heading = "BACKDROP",
        help = "Freeze the backdrop (generate it, never animate it)"
    )]
    pub no_drift: bool,

    #[arg(
        short = 'c',
        long = "color",
        default_value = "meadow",
        help_heading = "APPEARANCE",
        help = "Color theme (see --list-colors)"
    )]
    pub color: String,

    #[arg(
        long = "color-bg",
        default_value_t = ColorBg::Themed,
        value_enum,
        help_heading = "APPEARANCE",
        help = "Background mode (black, themed, transparent)"
    )]
    pub color_bg: ColorBg,

    #[arg(
        long = "colormode",
        help_heading = "APPEARANCE",
        help = "Force color mode (allowed: 0,8,24). Default: 24-bit if supported (COLORTERM), else 8-bit"
    )]
    pub colormode: Option<u16>,

    #[arg(
        long = "ascii",
        help_heading = "APPEARANCE",
        help = "Force ASCII glyphs (default: on when LANG is not UTF-8)"
    )]
    pub ascii: bool,

    #[arg(
        long = "check-bitcolor",
        help_heading = "HELP",
        help = "Print detected terminal color capability and exit"
    )]
    pub check_bitcolor: bool,

    #[arg(
        long = "help-detail",
        help_heading = "HELP",
        help = "Show detailed help for all parameters and exit"
    )]
    pub help_detail: bool,

    #[arg(
        long = "list-colors",
        help_heading = "HELP",
        help = "List available color themes and exit"
    )]
    pub list_colors: bool,

    #[arg(
        long = "list-topics",
        help_heading = "HELP",
        help = "List the guide's topics and exit"
    )]
    pub list_topics: bool,

    #[arg(
        long = "info",
        short = 'i',
        help_heading = "HELP",
        help = "Print version info and exit"
    )]
    pub info: bool,

    #[arg(
        long = "version",
        short = 'v',
        help_heading = "HELP",
        help = "Print version and exit"
    )]
    pub version: bool,
}

pub fn print_list_colors() {
    if color_enabled_stdout() {
        println!("\x1b[1;36mAVAILABLE COLOR THEMES:\x1b[0m");
        println!("\x1b[2mNOTE: Use only the VALUE (left side) with --color.\x1b[0m");
    } else {
        println!("AVAILABLE COLOR THEMES:");
        println!("NOTE: Use only the VALUE (left side) with --color.");
    }
    println!();
    println!("VALUE        DESCRIPTION");
    println!("meadow       Forest meadow (default): emerald leaves, warm dust");
    println!("dusk         Violet sky with autumn leaves");
    println!("ocean        Sea mist and teal drift");
    println!("sakura       Blossom pinks");
    println!("night        Moonlit indigo");
    println!("mono         No colors (terminal defaults)");
}

pub fn print_list_topics() {
    if color_enabled_stdout() {
        println!("\x1b[1;36mGUIDE TOPICS:\x1b[0m");
    } else {
        println!("GUIDE TOPICS:");
    }
    println!();
    println!("KEY  TOPIC");
    for topic in &TOPICS {
        println!("{}    {}", topic.key, topic.label);
    }
}

pub fn print_help_detail() {
    let block = format!(
        "{}\n\nUSAGE:\n  spiritglade [OPTIONS]\n\nBACKDROP:\n  -t, --tick <ms>\n      Drift tick interval in milliseconds (min 10 max 1000).\n      Example: spiritglade --tick 100\n\n  --clouds <n>, --leaves <n>, --dust <n>\n      Backdrop population per category (min 0 max 100 each).\n      Example: spiritglade --clouds 2 --leaves 30 --dust 40\n\n  --seed <n>\n      Seed the backdrop generation for a reproducible sky.\n      Example: spiritglade --seed 42\n\n  --no-drift\n      Freeze the backdrop: the sky is generated but never animated.\n      Example: spiritglade --no-drift\n\nAPPEARANCE:\n  -c, --color <name>\n      Set theme (see --list-colors).\n      Example: spiritglade --color sakura\n\n  --colormode <0|8|24>\n      Force color mode; otherwise auto-detected from COLORTERM/TERM.\n      Example: spiritglade --colormode 24\n\n  --color-bg <black|themed|transparent>\n      Background mode.\n      Example: spiritglade --color-bg transparent\n\n  --ascii\n      Force ASCII glyphs regardless of locale.\n      Example: spiritglade --ascii\n\nKEYS:\n  1-4 ask the guide a question\n  q / Esc quit\n\nHELP:\n  --check-bitcolor\n      Print detected terminal color capability and exit.\n\n  --help\n      Show short help.\n\n  --help-detail\n      Show this detailed help.\n\n  --list-colors\n      List available color themes and exit.\n\n  --list-topics\n      List the guide's topics and exit.\n\n  -v, --version\n      Print version and exit.\n\n  -i, --info\n      Print version info and exit.\n",
        DEFAULT_PARAMS_USAGE
    );

    if color_enabled_stdout() {
        print!("{}", colorize_help_detail(&block));
    } else {
        print!("{}", block);
    }

    println!("LIMITS / VALID RANGES:");
    println!("  --tick <ms>              min 10 max 1000");
    println!("  --clouds <n>             min 0 max 100");
    println!("  --leaves <n>             min 0 max 100");
    println!("  --dust <n>               min 0 max 100");
    println!("  --colormode <0|8|24>     allowed values only (8==256)");
    println!();
    print_list_colors();
    println!();
    print_list_topics();
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn args_command_is_well_formed() {
        Args::command().debug_assert();
    }

    #[test]
    fn defaults_match_the_reference_configuration() {
        let args = Args::parse_from(["spiritglade"]);
        assert_eq!(args.tick_ms, 50);
        assert_eq!(args.clouds, 5);
        assert_eq!(args.leaves, 10);
        assert_eq!(args.dust, 15);
        assert_eq!(args.color, "meadow");
        assert_eq!(args.color_bg, ColorBg::Themed);
    }
}
