//! Command-line arguments.

use std::path::PathBuf;

use clap::{ArgGroup, Args, Parser, Subcommand};
use vatic_core::export::ExportFormat;
use vatic_core::tracklet::DuplicateFramePolicy;

#[derive(Parser, Debug)]
#[command(name = "vatic", version, about = "Plan annotation segments and export tracklets")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Import a video from its extracted frames and plan its segments.
    Load(LoadArgs),
    /// Mark a video as a training video and withdraw its jobs.
    Training(TrainingArgs),
    /// Delete a video and everything attached to it.
    Delete(DeleteArgs),
    /// Export the annotations of a video.
    Dump(DumpArgs),
    /// List every imported video.
    List,
}

#[derive(Args, Debug)]
pub struct LoadArgs {
    /// Unique identifier for the video.
    pub slug: String,
    /// Directory holding the extracted frames.
    #[arg(value_name = "LOCATION")]
    pub location: PathBuf,
    /// Labels workers may assign to boxes.
    #[arg(required = true, num_args = 1..)]
    pub labels: Vec<String>,
    /// Frames per segment (default from `VATIC_SEGMENT_LENGTH`).
    #[arg(long)]
    pub length: Option<i32>,
    /// Extra frames each segment shares with the next (default from `VATIC_SEGMENT_OVERLAP`).
    #[arg(long)]
    pub overlap: Option<i32>,
    /// Frames to skip between shown frames.
    #[arg(long, default_value_t = 0)]
    pub skip: i32,
    /// Slug of a training video workers must pass first.
    #[arg(long, value_name = "SLUG")]
    pub trainer: Option<String>,
}

#[derive(Args, Debug)]
pub struct TrainingArgs {
    pub slug: String,
}

#[derive(Args, Debug)]
pub struct DeleteArgs {
    pub slug: String,
    /// Delete even when annotations exist.
    #[arg(long)]
    pub force: bool,
}

#[derive(Args, Debug)]
#[command(group(ArgGroup::new("format").args(["xml", "json", "matlab", "pickle"])))]
pub struct DumpArgs {
    pub slug: String,
    /// Fill the frames between keyframes.
    #[arg(short, long)]
    pub interpolate: bool,
    /// Write to this file instead of stdout.
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,
    #[arg(short = 'x', long)]
    pub xml: bool,
    #[arg(short, long)]
    pub json: bool,
    #[arg(long)]
    pub matlab: bool,
    #[arg(short, long)]
    pub pickle: bool,
    /// How to treat several boxes of one tracklet on the same frame.
    #[arg(long, value_name = "POLICY", default_value = "keep-all")]
    pub dedup: DuplicateFramePolicy,
}

impl DumpArgs {
    /// Selected output format; plain text unless a format flag is given.
    pub fn format(&self) -> ExportFormat {
        if self.xml {
            ExportFormat::Xml
        } else if self.json {
            ExportFormat::Json
        } else if self.matlab {
            ExportFormat::Matlab
        } else if self.pickle {
            ExportFormat::Pickle
        } else {
            ExportFormat::Text
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn parse(args: &[&str]) -> Result<Cli, clap::Error> {
        Cli::try_parse_from(std::iter::once("vatic").chain(args.iter().copied()))
    }

    #[test]
    fn load_takes_labels_and_optional_plan() {
        let cli = parse(&["load", "street", "/frames/street", "car", "person", "--length", "150"]).unwrap();
        let Command::Load(args) = cli.command else {
            panic!("expected load");
        };
        assert_eq!(args.slug, "street");
        assert_eq!(args.labels, vec!["car", "person"]);
        assert_eq!(args.length, Some(150));
        assert_eq!(args.overlap, None);
        assert_eq!(args.skip, 0);
        assert_eq!(args.trainer, None);
    }

    #[test]
    fn load_requires_a_label() {
        assert!(parse(&["load", "street", "/frames/street"]).is_err());
    }

    #[test]
    fn dump_defaults_to_text_keep_all() {
        let cli = parse(&["dump", "street"]).unwrap();
        let Command::Dump(args) = cli.command else {
            panic!("expected dump");
        };
        assert_eq!(args.format(), ExportFormat::Text);
        assert_eq!(args.dedup, DuplicateFramePolicy::KeepAll);
        assert!(!args.interpolate);
        assert_eq!(args.output, None);
    }

    #[test]
    fn dump_format_flags() {
        for (flag, format) in [
            ("-x", ExportFormat::Xml),
            ("--json", ExportFormat::Json),
            ("--matlab", ExportFormat::Matlab),
            ("-p", ExportFormat::Pickle),
        ] {
            let cli = parse(&["dump", "street", flag]).unwrap();
            let Command::Dump(args) = cli.command else {
                panic!("expected dump");
            };
            assert_eq!(args.format(), format);
        }
    }

    #[test]
    fn dump_rejects_two_formats() {
        assert!(parse(&["dump", "street", "--xml", "--json"]).is_err());
    }

    #[test]
    fn dump_dedup_policy_is_parsed() {
        let cli = parse(&["dump", "street", "-i", "-o", "out.txt", "--dedup", "keep-last"]).unwrap();
        let Command::Dump(args) = cli.command else {
            panic!("expected dump");
        };
        assert!(args.interpolate);
        assert_eq!(args.output, Some(PathBuf::from("out.txt")));
        assert_eq!(args.dedup, DuplicateFramePolicy::KeepLast);

        assert!(parse(&["dump", "street", "--dedup", "first"]).is_err());
    }

    #[test]
    fn delete_force_flag() {
        let cli = parse(&["delete", "street", "--force"]).unwrap();
        assert_matches!(cli.command, Command::Delete(DeleteArgs { force: true, .. }));
    }

    #[test]
    fn list_has_no_arguments() {
        assert_matches!(parse(&["list"]).unwrap().command, Command::List);
    }
}
