//! Tests for the run module.

use super::*;

mod run_error {
    use super::*;

    #[test]
    fn login_failure_displays_reason() {
        let error = RunError::from(BootstrapError::LoginFailed {
            reason: "Request rejected: credentials not accepted".to_string(),
        });
        assert_eq!(
            error.to_string(),
            "failed to login(Request rejected: credentials not accepted)"
        );
    }

    #[test]
    fn events_failure_displays_source() {
        let error = RunError::Events(ApiError::Unauthorized);
        assert_eq!(error.to_string(), "Event stream failed: Session is not authorized");
    }

    #[test]
    fn http_client_failure_displays_source() {
        let error = RunError::HttpClient(HttpError::InvalidUrl("bad".to_string()));
        assert!(error.to_string().contains("Failed to create HTTP client"));
    }

    #[test]
    fn debug_format_works() {
        let error = RunError::Events(ApiError::NotConnected);
        let debug_str = format!("{error:?}");
        assert!(debug_str.contains("NotConnected"));
    }
}

mod client_options {
    use super::*;
    use arlo_downloader::config::{Cli, Environment};
    use std::time::Duration;

    fn make_test_config(args: &[&str], debug: &str) -> ValidatedConfig {
        let mut argv = vec!["arlo-downloader"];
        argv.extend_from_slice(args);
        let cli = Cli::parse_from_iter(argv);
        let env = Environment::from_pairs([
            ("ARLO_USERNAME", "user@example.com"),
            ("ARLO_PASSWORD", "secret"),
            ("SAVE_MEDIA_TO", "/env/media"),
            ("DEBUG", debug),
        ]);
        ValidatedConfig::from_raw(&cli, &env).unwrap()
    }

    #[test]
    fn carries_credentials_and_second_factor() {
        let config = make_test_config(&["-t", "EMAIL", "-s", "imap", "-r", "2"], "0");
        let options = client_config(&config);

        assert_eq!(options.credentials.username, "user@example.com");
        assert_eq!(options.credentials.password(), "secret");
        assert_eq!(options.tfa.tfa_type, "EMAIL");
        assert_eq!(options.tfa.source, "imap");
        assert_eq!(options.tfa.retries, 2);
    }

    #[test]
    fn fixed_operational_defaults() {
        let options = client_config(&make_test_config(&[], "0"));

        assert_eq!(options.reconnect_every, Duration::from_secs(110));
        assert!(!options.synchronous_mode);
        assert!(options.save_state);
        assert_eq!(options.storage_dir, std::path::PathBuf::from("aarlo"));
    }

    #[test]
    fn cli_media_path_wins_over_environment() {
        let options = client_config(&make_test_config(&["-m", "/cli/media"], "0"));
        assert_eq!(options.save_media_to.as_deref(), Some("/cli/media"));

        let options = client_config(&make_test_config(&[], "0"));
        assert_eq!(options.save_media_to.as_deref(), Some("/env/media"));
    }

    #[test]
    fn verbosity_follows_debug_level() {
        let options = client_config(&make_test_config(&[], "1"));
        assert!(!options.verbose_debug);
        assert!(!options.dump);

        let options = client_config(&make_test_config(&["-d", "2"], "0"));
        assert!(options.verbose_debug);
        assert!(!options.dump);

        let options = client_config(&make_test_config(&[], "3"));
        assert!(options.verbose_debug);
        assert!(options.dump);
    }

    #[test]
    fn display_omits_secrets() {
        let options = client_config(&make_test_config(&["-P", "imap-pass"], "0"));
        let shown = options.to_string();

        assert!(shown.contains("reconnect_every=110s"));
        assert!(!shown.contains("secret"));
        assert!(!shown.contains("imap-pass"));
    }
}
