//! ASCII art banner for interactive mode.

use std::io::IsTerminal;

/// ANSI true-color escape sequences for the banner palette.
struct Colors {
    bell: &'static str,
    title: &'static str,
    subtitle: &'static str,
    reset: &'static str,
}

const COLOR: Colors = Colors {
    bell: "\x1b[38;2;243;156;18m",
    title: "\x1b[1;38;2;52;152;219m",
    subtitle: "\x1b[38;2;100;100;120m",
    reset: "\x1b[0m",
};

const PLAIN: Colors = Colors {
    bell: "",
    title: "",
    subtitle: "",
    reset: "",
};

/// Prints the alertbus banner to stdout.
///
/// Renders ANSI true-color when stdout is a terminal,
/// falls back to plain text otherwise.
pub fn print_banner() {
    let c = if std::io::stdout().is_terminal() {
        &COLOR
    } else {
        &PLAIN
    };

    let bl = c.bell;
    let tt = c.title;
    let st = c.subtitle;
    let r = c.reset;
    let version = env!("CARGO_PKG_VERSION");

    println!(
        r#"
{bl}      ▄█▄{r}
{bl}    ▄█████▄{r}      {tt}  ___  _           _   _{r}
{bl}    ███████{r}      {tt} / _ \| | ___ _ __| |_| |__  _   _ ___{r}
{bl}   █████████{r}     {tt}| |_| | |/ _ \ '__| __| '_ \| | | / __|{r}
{bl}  ▀▀▀▀▀▀▀▀▀▀▀{r}    {tt}|  _  | |  __/ |  | |_| |_) | |_| \__ \{r}
{bl}      ▀█▀{r}        {tt}|_| |_|_|\___|_|   \__|_.__/ \__,_|___/{r}

                  {st}v{version}  events in, notifications out{r}
"#
    );
}
