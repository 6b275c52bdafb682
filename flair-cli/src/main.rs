//! Command-line front end for `flair`.

use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr as _;

use anyhow::{Context as _, Result, bail};
use clap::{Parser, ValueEnum};
use flair::style::{self, Options};
use flair::{Flair, Mode, ModeKind};
use log::debug;

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();
    let flair = Flair::default();
    if cli.list_fonts {
        for name in flair.registry().names() {
            println!("{name}");
        }
        return Ok(());
    }
    let registered = cli.register_font(&flair)?;
    let options = cli.options()?;
    let Some(input) = &cli.input else {
        bail!("nothing to render");
    };
    let rendered = flair.render(input, &cli.mode(registered), &options)?;
    println!("{}", rendered.styled(&options));
    Ok(())
}

#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// The text to render
    #[arg(required_unless_present = "list_fonts")]
    input: Option<String>,
    /// Render mode: art or plain-text
    #[arg(short = 'm', long, default_value = "art", value_parser = ModeKind::from_str)]
    mode: ModeKind,
    /// Font name (art mode)
    #[arg(short = 'f', long)]
    font: Option<String>,
    /// JSON font table to register before rendering
    #[arg(long)]
    font_file: Option<PathBuf>,
    /// Name to register --font-file under (defaults to the file stem)
    #[arg(long, requires = "font_file")]
    font_name: Option<String>,
    /// JSON options file; flags below override it
    #[arg(long)]
    options: Option<PathBuf>,
    /// Maximum output width
    #[arg(short = 'w', long)]
    width: Option<usize>,
    #[arg(short = 'c', long, value_enum)]
    color: Option<ColorArg>,
    #[arg(short = 'b', long)]
    bold: bool,
    #[arg(long)]
    border: bool,
    /// Blank lines above and below
    #[arg(short = 'p', long)]
    padding: Option<usize>,
    /// Print the available font names and exit
    #[arg(long)]
    list_fonts: bool,
}

impl Cli {
    /// Registers `--font-file`, returning the name it was registered under.
    fn register_font(&self, flair: &Flair) -> Result<Option<String>> {
        let Some(path) = &self.font_file else {
            return Ok(None);
        };
        let name = match &self.font_name {
            Some(name) => name.clone(),
            None => file_stem(path)?,
        };
        let contents =
            fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
        let font: serde_json::Value = serde_json::from_str(&contents)
            .with_context(|| format!("parsing {}", path.display()))?;
        flair.registry().register_json(&name, &font)?;
        debug!("registered {} as {name}", path.display());
        Ok(Some(name))
    }

    fn options(&self) -> Result<Options> {
        let mut options = match &self.options {
            Some(path) => {
                let contents = fs::read_to_string(path)
                    .with_context(|| format!("reading {}", path.display()))?;
                serde_json::from_str(&contents)
                    .with_context(|| format!("parsing {}", path.display()))?
            }
            None => Options::default(),
        };
        if let Some(width) = self.width {
            options = options.max_width(width);
        }
        if let Some(color) = self.color {
            options = options.color(color.into());
        }
        if let Some(padding) = self.padding {
            options = options.padding(padding);
        }
        if self.bold {
            options = options.bold(true);
        }
        if self.border {
            options = options.border(true);
        }
        Ok(options)
    }

    fn mode(&self, registered: Option<String>) -> Mode {
        match self.mode {
            ModeKind::Art => Mode::Art {
                font: self.font.clone().or(registered),
            },
            ModeKind::PlainText => Mode::PlainText,
        }
    }
}

fn file_stem(path: &Path) -> Result<String> {
    path.file_stem()
        .and_then(|stem| stem.to_str())
        .map(str::to_owned)
        .with_context(|| format!("{} has no usable file stem", path.display()))
}

#[derive(Clone, Copy, ValueEnum)]
#[value(rename_all = "lowercase")]
enum ColorArg {
    Red,
    Green,
    Yellow,
    Blue,
    Magenta,
    Cyan,
    White,
}

impl From<ColorArg> for style::Color {
    fn from(value: ColorArg) -> Self {
        match value {
            ColorArg::Red => Self::Red,
            ColorArg::Green => Self::Green,
            ColorArg::Yellow => Self::Yellow,
            ColorArg::Blue => Self::Blue,
            ColorArg::Magenta => Self::Magenta,
            ColorArg::Cyan => Self::Cyan,
            ColorArg::White => Self::White,
        }
    }
}

#[cfg(test)]
mod tests {
    use clap::{CommandFactory as _, Parser as _};
    use flair::Mode;
    use flair::style::{Color, Options};

    use super::Cli;

    #[test]
    fn command_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn flags_override_defaults() {
        let cli = Cli::parse_from(["flair-cli", "Hi", "-w", "40", "-c", "cyan", "--border"]);
        assert_eq!(
            cli.options().unwrap(),
            Options::default().max_width(40).color(Color::Cyan).border(true)
        );
        assert_eq!(cli.mode(None), Mode::Art { font: None });
    }

    #[test]
    fn explicit_font_beats_registered() {
        let cli = Cli::parse_from(["flair-cli", "Hi", "-f", "mini"]);
        assert_eq!(cli.mode(Some("custom".to_owned())), Mode::art("mini"));
        let cli = Cli::parse_from(["flair-cli", "Hi"]);
        assert_eq!(cli.mode(Some("custom".to_owned())), Mode::art("custom"));
        let cli = Cli::parse_from(["flair-cli", "Hi", "-m", "plain-text"]);
        assert_eq!(cli.mode(None), Mode::PlainText);
    }

    #[test]
    fn unknown_mode_is_rejected() {
        let error = Cli::try_parse_from(["flair-cli", "Hi", "-m", "invalid"])
            .err()
            .unwrap();
        assert!(error.to_string().contains(r#"unknown mode "invalid""#));
    }

    #[test]
    fn list_fonts_needs_no_input() {
        let cli = Cli::try_parse_from(["flair-cli", "--list-fonts"]).unwrap();
        assert!(cli.list_fonts && cli.input.is_none());
        assert!(Cli::try_parse_from(["flair-cli"]).is_err());
    }
}
