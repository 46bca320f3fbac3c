//! Tests for CLI argument parsing.

use super::cli::{Cli, DebugArg, TfaSourceArg, TfaTypeArg};

mod parsing {
    use super::*;

    #[test]
    fn parse_no_args_yields_nothing_supplied() {
        let cli = Cli::parse_from_iter(["arlo-downloader"]);

        assert_eq!(cli.debug, DebugArg::Off);
        assert!(cli.save_media_to.is_none());
        assert!(cli.tfa_type.is_none());
        assert!(cli.tfa_source.is_none());
        assert!(cli.tfa_retries.is_none());
        assert!(cli.tfa_delay.is_none());
        assert!(cli.tfa_host.is_none());
        assert!(cli.tfa_username.is_none());
        assert!(cli.tfa_password.is_none());
    }

    #[test]
    fn parse_long_flags() {
        let cli = Cli::parse_from_iter([
            "arlo-downloader",
            "--debug",
            "2",
            "--save-media-to",
            "/media/${SN}/${Y}${m}${d}",
            "--tfa-type",
            "EMAIL",
            "--tfa-source",
            "imap",
            "--tfa-retries",
            "3",
            "--tfa-delay",
            "7",
            "--tfa-host",
            "imap.example.com",
            "--tfa-username",
            "me@example.com",
            "--tfa-password",
            "hunter2",
        ]);

        assert_eq!(cli.debug, DebugArg::Verbose);
        assert_eq!(cli.save_media_to.as_deref(), Some("/media/${SN}/${Y}${m}${d}"));
        assert_eq!(cli.tfa_type, Some(TfaTypeArg::Email));
        assert_eq!(cli.tfa_source, Some(TfaSourceArg::Imap));
        assert_eq!(cli.tfa_retries, Some(3));
        assert_eq!(cli.tfa_delay, Some(7));
        assert_eq!(cli.tfa_host.as_deref(), Some("imap.example.com"));
        assert_eq!(cli.tfa_username.as_deref(), Some("me@example.com"));
        assert_eq!(cli.tfa_password.as_deref(), Some("hunter2"));
    }

    #[test]
    fn parse_short_flags() {
        let cli = Cli::parse_from_iter([
            "arlo-downloader",
            "-d",
            "3",
            "-m",
            "/tmp/x",
            "-t",
            "PUSH",
            "-s",
            "push",
            "-r",
            "1",
            "-D",
            "2",
            "-H",
            "h",
            "-U",
            "u",
            "-P",
            "p",
        ]);

        assert_eq!(cli.debug, DebugArg::Dump);
        assert_eq!(cli.save_media_to.as_deref(), Some("/tmp/x"));
        assert_eq!(cli.tfa_type, Some(TfaTypeArg::Push));
        assert_eq!(cli.tfa_source, Some(TfaSourceArg::Push));
        assert_eq!(cli.tfa_retries, Some(1));
        assert_eq!(cli.tfa_delay, Some(2));
        assert_eq!(cli.tfa_host.as_deref(), Some("h"));
        assert_eq!(cli.tfa_username.as_deref(), Some("u"));
        assert_eq!(cli.tfa_password.as_deref(), Some("p"));
    }

    #[test]
    fn zero_and_empty_values_still_count_as_supplied() {
        let cli = Cli::parse_from_iter(["arlo-downloader", "-r", "0", "-H", ""]);

        assert_eq!(cli.tfa_retries, Some(0));
        assert_eq!(cli.tfa_host.as_deref(), Some(""));
    }
}

mod rejection {
    use super::*;

    #[test]
    fn debug_level_outside_closed_set_is_rejected() {
        assert!(Cli::try_parse_from_iter(["arlo-downloader", "-d", "4"]).is_err());
    }

    #[test]
    fn tfa_type_is_case_sensitive() {
        assert!(Cli::try_parse_from_iter(["arlo-downloader", "-t", "push"]).is_err());
    }

    #[test]
    fn unknown_tfa_source_is_rejected() {
        assert!(Cli::try_parse_from_iter(["arlo-downloader", "-s", "sms"]).is_err());
    }

    #[test]
    fn non_numeric_retries_are_rejected() {
        assert!(Cli::try_parse_from_iter(["arlo-downloader", "-r", "many"]).is_err());
    }

    #[test]
    fn negative_delay_is_rejected() {
        assert!(Cli::try_parse_from_iter(["arlo-downloader", "--tfa-delay", "-5"]).is_err());
    }

    #[test]
    fn unknown_flag_is_rejected() {
        assert!(Cli::try_parse_from_iter(["arlo-downloader", "--username", "x"]).is_err());
    }
}

mod enums {
    use super::*;

    #[test]
    fn debug_arg_levels() {
        assert_eq!(DebugArg::Off.level(), 0);
        assert_eq!(DebugArg::Debug.level(), 1);
        assert_eq!(DebugArg::Verbose.level(), 2);
        assert_eq!(DebugArg::Dump.level(), 3);
    }

    #[test]
    fn tfa_wire_names() {
        assert_eq!(TfaTypeArg::Push.as_str(), "PUSH");
        assert_eq!(TfaTypeArg::Email.as_str(), "EMAIL");
        assert_eq!(TfaSourceArg::Push.as_str(), "push");
        assert_eq!(TfaSourceArg::Imap.as_str(), "imap");
    }
}
