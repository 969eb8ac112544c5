use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use gelimage::capture::image::FileImageProvider;
use gelimage::config::{self, AnnotationConfig};
use gelimage::export::{self, ExportKind};
use gelimage::render::TextMeasure;
use gelimage::session::{self, Command, SessionState};

/// Annotate a gel image and export it as SVG or PNG
#[derive(Parser, Debug)]
#[command(name = "gelimage", version)]
struct Cli {
    /// Gel image to open
    image: PathBuf,
    /// Destination file; `.svg` or `.png` picks the format, `.svg` is appended
    /// when neither is given. Defaults to a timestamped file next to the image.
    output: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();

    let config = AnnotationConfig::load();
    let table = config::load_ladder_table();
    if let Err(err) = config.validate(&table) {
        log::warn!("{}", err);
    }
    let measure = TextMeasure::for_font(&config.font);
    let mut session = SessionState::new(config, table);

    session::handle_command(&mut session, &FileImageProvider, Command::Open(cli.image.clone()))
        .with_context(|| format!("failed to open {}", cli.image.display()))?;

    let output = match cli.output {
        Some(path) => path,
        None => export::default_export_path(Some(&cli.image), ExportKind::Svg)
            .context("no directory to export into")?,
    };
    let written = export::export_session(&mut session, None, &output, measure)
        .with_context(|| format!("failed to export {}", output.display()))?;
    println!("{}", written.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_arguments() {
        let cli = Cli::try_parse_from(["gelimage", "gel.tif", "out.png"]).unwrap();
        assert_eq!(cli.image, PathBuf::from("gel.tif"));
        assert_eq!(cli.output, Some(PathBuf::from("out.png")));

        let cli = Cli::try_parse_from(["gelimage", "gel.tif"]).unwrap();
        assert!(cli.output.is_none());

        assert!(Cli::try_parse_from(["gelimage"]).is_err());
        let help = Cli::try_parse_from(["gelimage", "--help"]).unwrap_err();
        assert_eq!(help.kind(), clap::error::ErrorKind::DisplayHelp);
    }
}
