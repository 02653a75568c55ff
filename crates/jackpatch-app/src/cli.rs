//! Command-line arguments.

use clap::Parser;
use kurbo::Size;
use std::path::PathBuf;

/// Jackpatch headless pumpkin decorator.
///
/// Replays a script of drops, clicks, drags, key presses and toolbar
/// commands against a fresh session and writes any downloads to --out.
#[derive(Parser, Debug)]
#[command(
    name = "jackpatch",
    about = "Decorate a pumpkin from a script of editor actions",
    long_about = "Replay a JSON script of editor actions against a fresh pumpkin.\n\n\
                  Example:\n  \
                  jackpatch --assets parts/ --script carve.json --out exports/"
)]
pub struct CliArgs {
    /// Directory of droppable PNG, JPEG or WebP parts. An optional
    /// manifest.json overrides names and default sizes.
    #[arg(short, long, value_name = "DIR", required_unless_present = "keys")]
    pub assets: Option<PathBuf>,

    /// JSON array of actions to replay.
    #[arg(short, long, value_name = "FILE.json", required_unless_present = "keys")]
    pub script: Option<PathBuf>,

    /// Directory that downloads are written to.
    #[arg(short, long, value_name = "DIR", default_value = ".")]
    pub out: PathBuf,

    /// Editor configuration file (JSON). Missing fields use defaults.
    #[arg(short, long, value_name = "FILE.json")]
    pub config: Option<PathBuf>,

    /// Window size the stage is laid out for.
    #[arg(long, value_name = "WxH", default_value = "1280x800", value_parser = parse_window)]
    pub window: Size,

    /// Answer yes to confirmation prompts (clear all).
    #[arg(short, long)]
    pub yes: bool,

    /// Print the keyboard shortcuts and exit.
    #[arg(long)]
    pub keys: bool,
}

/// Parse a `WIDTHxHEIGHT` window size.
pub fn parse_window(raw: &str) -> Result<Size, String> {
    let (w, h) = raw
        .split_once(['x', 'X'])
        .ok_or_else(|| format!("expected WIDTHxHEIGHT, got {:?}", raw))?;
    let parse = |s: &str| {
        s.trim()
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite() && *v > 0.0)
            .ok_or_else(|| format!("invalid dimension {:?}", s))
    };
    Ok(Size::new(parse(w)?, parse(h)?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_window() {
        assert_eq!(parse_window("1280x800"), Ok(Size::new(1280.0, 800.0)));
        assert_eq!(parse_window("640X480"), Ok(Size::new(640.0, 480.0)));
        assert!(parse_window("1280").is_err());
        assert!(parse_window("0x10").is_err());
        assert!(parse_window("axb").is_err());
    }

    #[test]
    fn test_args() {
        let args = CliArgs::parse_from([
            "jackpatch",
            "--assets",
            "parts",
            "--script",
            "carve.json",
            "--window",
            "800x600",
            "-y",
        ]);
        assert_eq!(args.assets, Some(PathBuf::from("parts")));
        assert_eq!(args.out, PathBuf::from("."));
        assert_eq!(args.window, Size::new(800.0, 600.0));
        assert!(args.yes);
        assert!(!args.keys);
    }

    #[test]
    fn test_keys_alone_is_enough() {
        let args = CliArgs::try_parse_from(["jackpatch", "--keys"]).unwrap();
        assert!(args.keys);
        assert!(CliArgs::try_parse_from(["jackpatch"]).is_err());
    }
}
