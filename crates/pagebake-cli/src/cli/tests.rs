#[cfg(test)]
mod tests {
    use crate::cli::{Cli, Command};
    use clap::Parser;
    use std::path::PathBuf;

    #[test]
    fn test_build_defaults() {
        let cli = Cli::try_parse_from(["pagebake", "build"]).unwrap();
        let Command::Build(args) = cli.command else {
            panic!("expected build");
        };
        assert!(args.cwd.is_none());
        assert!(!args.upload);
        assert!(!args.no_collapse_whitespace);
    }

    #[test]
    fn test_build_flags() {
        let cli = Cli::try_parse_from([
            "pagebake",
            "build",
            "--cwd",
            "site",
            "--out-html",
            "public/index.html",
            "--upload",
            "--error-tracking",
            "--timestamp",
            "1700000000000",
            "--debug-define",
            "globalThis.DEV",
        ])
        .unwrap();
        let Command::Build(args) = cli.command else {
            panic!("expected build");
        };
        assert_eq!(args.cwd, Some(PathBuf::from("site")));
        assert_eq!(args.out_html, Some(PathBuf::from("public/index.html")));
        assert!(args.upload);
        assert!(args.error_tracking);
        assert_eq!(args.timestamp, Some(1_700_000_000_000));
        assert_eq!(args.debug_define.as_deref(), Some("globalThis.DEV"));
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["pagebake", "check", "--verbose", "--no-color"]).unwrap();
        assert!(cli.verbose);
        assert!(cli.no_color);
    }

    #[test]
    fn test_verbose_conflicts_with_quiet() {
        assert!(Cli::try_parse_from(["pagebake", "-v", "-q", "build"]).is_err());
    }

    #[test]
    fn test_init_flags() {
        let cli = Cli::try_parse_from(["pagebake", "init", "--force", "--schema"]).unwrap();
        let Command::Init(args) = cli.command else {
            panic!("expected init");
        };
        assert!(args.force);
        assert!(args.schema);
    }
}
