//! Styled terminal output
//!
//! `anstream` strips the ANSI styles when the stream is not a terminal.

use std::io::Write;

use anstyle::{AnsiColor, Effects, Style};

use crate::application::Console;

const ERROR_RULE: &str = "Cube.js Error ---------------------------------------";
const HELP_RULE: &str = "Need some help? -------------------------------------";
const SLACK_URL: &str = "https://publicslack.com/slacks/cubejs/invites/new";
const ISSUES_URL: &str = "https://github.com/statsbotco/cube.js/issues";

const TITLE: Style = Style::new().fg_color(Some(anstyle::Color::Ansi(AnsiColor::Cyan)));
const HELP: Style = Style::new().fg_color(Some(anstyle::Color::Ansi(AnsiColor::Yellow)));

/// Clap help styling matching the console palette
pub fn clap_styles() -> clap::builder::Styles {
    clap::builder::Styles::styled()
        .header(TITLE.effects(Effects::BOLD))
        .usage(TITLE.effects(Effects::BOLD))
        .literal(Style::new().effects(Effects::BOLD))
        .placeholder(HELP)
}

pub fn write_stage(out: &mut impl Write, text: &str) {
    writeln!(out, "- {text}").ok();
}

pub fn write_error_block(out: &mut impl Write, lines: &[String]) {
    writeln!(out).ok();
    writeln!(out, "{TITLE}{ERROR_RULE}{TITLE:#}").ok();
    writeln!(out).ok();
    for line in lines {
        writeln!(out, "{line}").ok();
    }
    writeln!(out).ok();
    writeln!(out, "{HELP}{HELP_RULE}{HELP:#}").ok();
}

pub fn write_help_pointers(out: &mut impl Write) {
    writeln!(out).ok();
    writeln!(out, "{HELP}  Ask this question in Cube.js Slack:{HELP:#} {SLACK_URL}").ok();
    writeln!(out, "{HELP}  Post an issue:{HELP:#} {ISSUES_URL}").ok();
    writeln!(out).ok();
}

/// Console writing progress to stdout and errors to stderr
#[derive(Debug, Default)]
pub struct StdConsole;

impl Console for StdConsole {
    fn stage(&self, text: &str) {
        write_stage(&mut anstream::stdout().lock(), text);
    }

    fn line(&self, text: &str) {
        writeln!(anstream::stdout().lock(), "{text}").ok();
    }

    fn error_block(&self, lines: &[String]) {
        write_error_block(&mut anstream::stderr().lock(), lines);
    }

    fn help_pointers(&self) {
        write_help_pointers(&mut anstream::stderr().lock());
    }
}
