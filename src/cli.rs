//! Command-line interface definitions

use crate::region::Region;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Removes advertisement footers, QR-code strips and unwanted regions from
/// scanned PDF pages, then trims white margins.
#[derive(Debug, Parser)]
#[command(name = "adsweep-pdf", version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Clean PDFs or page images
    Clean(CleanArgs),
    /// Show system and external tool information
    Info,
    /// Show the processing cache entry for an output file
    CacheInfo(CacheInfoArgs),
}

/// Arguments for the clean command
#[derive(Debug, Args)]
pub struct CleanArgs {
    /// Input PDF or image file, or a directory of PDFs
    pub input: PathBuf,

    /// Output file, or output directory for directory input
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Keep only this region and blank the rest, as X1,Y1,X2,Y2 pixel
    /// coordinates (repeatable)
    #[arg(long, value_name = "X1,Y1,X2,Y2")]
    pub keep: Vec<Region>,

    /// JSON file mapping page indexes to keep regions
    #[arg(long, value_name = "FILE", conflicts_with = "keep")]
    pub keep_map: Option<PathBuf>,

    /// Fraction of the page height scanned for footer ads, 0 to 1
    #[arg(long, value_name = "FRACTION")]
    pub footer_fraction: Option<f32>,

    /// Do not trim white margins after cleaning
    #[arg(long)]
    pub no_trim: bool,

    /// Luminance at or above this value counts as background when trimming
    #[arg(long, value_name = "LEVEL")]
    pub background_threshold: Option<u8>,

    /// Write cleaned pages as PNG files instead of assembling a PDF
    #[arg(long)]
    pub images: bool,

    /// Rasterization resolution
    #[arg(long, value_name = "DPI")]
    pub dpi: Option<u32>,

    /// JPEG quality for the output PDF, 1 to 100
    #[arg(long, value_name = "QUALITY")]
    pub jpeg_quality: Option<u8>,

    /// Worker thread count (default: one per CPU)
    #[arg(long, value_name = "N")]
    pub threads: Option<usize>,

    /// Process at most this many pages per document
    #[arg(long, value_name = "N")]
    pub max_pages: Option<usize>,

    /// Reprocess even when a valid cache entry exists
    #[arg(long)]
    pub force: bool,

    /// Skip files whose output already exists
    #[arg(long)]
    pub skip_existing: bool,

    /// Config file path (default: ./adsweep.toml, then the user config)
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Show the execution plan without processing anything
    #[arg(long)]
    pub dry_run: bool,

    /// Increase output detail (repeat for more)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,
}

/// Arguments for the cache-info command
#[derive(Debug, Args)]
pub struct CacheInfoArgs {
    /// Output PDF whose cache entry to inspect
    pub output_pdf: PathBuf,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_clean_with_keep_regions() {
        let cli = Cli::try_parse_from([
            "adsweep-pdf",
            "clean",
            "book.pdf",
            "--keep",
            "10,20,300,400",
            "--keep",
            "0,0,50,50",
            "-o",
            "out.pdf",
        ])
        .unwrap();

        match cli.command {
            Commands::Clean(args) => {
                assert_eq!(args.input, PathBuf::from("book.pdf"));
                assert_eq!(args.output, Some(PathBuf::from("out.pdf")));
                assert_eq!(args.keep.len(), 2);
                assert_eq!(args.keep[0], Region::new(10, 20, 300, 400));
                assert!(!args.no_trim);
            }
            _ => panic!("expected clean command"),
        }
    }

    #[test]
    fn test_keep_conflicts_with_keep_map() {
        let result = Cli::try_parse_from([
            "adsweep-pdf",
            "clean",
            "book.pdf",
            "--keep",
            "0,0,10,10",
            "--keep-map",
            "regions.json",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_invalid_keep_region_rejected() {
        let result = Cli::try_parse_from([
            "adsweep-pdf",
            "clean",
            "book.pdf",
            "--keep",
            "10,20,300",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_verbose_count() {
        let cli = Cli::try_parse_from(["adsweep-pdf", "clean", "book.pdf", "-vv"]).unwrap();
        match cli.command {
            Commands::Clean(args) => assert_eq!(args.verbose, 2),
            _ => panic!("expected clean command"),
        }
    }

    #[test]
    fn test_quiet_conflicts_with_verbose() {
        let result = Cli::try_parse_from(["adsweep-pdf", "clean", "book.pdf", "-q", "-v"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_parse_cache_info() {
        let cli = Cli::try_parse_from(["adsweep-pdf", "cache-info", "out.pdf"]).unwrap();
        match cli.command {
            Commands::CacheInfo(args) => {
                assert_eq!(args.output_pdf, PathBuf::from("out.pdf"));
            }
            _ => panic!("expected cache-info command"),
        }
    }
}
