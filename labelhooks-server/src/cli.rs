use clap::{Arg, Command, ValueHint};
use std::path::PathBuf;

/// CLI arguments for labelhooks-server
#[derive(Debug, Clone, Default)]
pub struct CliArgs {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub config_file: Option<PathBuf>,
    pub max_request_size: Option<usize>,
    pub base_url: Option<String>,
    pub log_level: Option<String>,
}

impl CliArgs {
    /// Parse command line arguments
    pub fn parse() -> Self {
        Self::from_matches(command().get_matches())
    }

    /// Parse from an explicit argument list
    pub fn try_parse_from<I, T>(args: I) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        Ok(Self::from_matches(command().try_get_matches_from(args)?))
    }

    fn from_matches(matches: clap::ArgMatches) -> Self {
        Self {
            host: matches.get_one::<String>("host").cloned(),
            port: matches.get_one::<u16>("port").copied(),
            config_file: matches.get_one::<PathBuf>("config").cloned(),
            max_request_size: matches.get_one::<usize>("max_request_size").copied(),
            base_url: matches.get_one::<String>("base_url").cloned(),
            log_level: matches.get_one::<String>("log_level").cloned(),
        }
    }
}

fn command() -> Command {
    Command::new("labelhooks-server")
        .version(labelhooks::VERSION)
        .about("HTTP API server for annotation platform webhooks")
        .long_about(
            r#"Labelhooks Server exposes a REST API for managing project and
organization webhooks and reading their delivery history.

The server can be configured through command line arguments, environment
variables or a configuration file. Command line arguments take precedence
over environment variables.

Examples:
  labelhooks-server --port 8080
  labelhooks-server --config labelhooks.toml --log-level debug"#,
        )
        .arg(
            Arg::new("host")
                .long("host")
                .value_name("HOST")
                .help("Address to bind")
                .long_help("Interface address to bind.\nEnvironment variable: LABELHOOKS_HOST")
                .value_hint(ValueHint::Hostname),
        )
        .arg(
            Arg::new("port")
                .short('p')
                .long("port")
                .value_name("PORT")
                .help("Port to listen on")
                .long_help(
                    "Port number for the HTTP server to listen on.\nEnvironment variable: LABELHOOKS_PORT",
                )
                .value_hint(ValueHint::Other)
                .value_parser(clap::value_parser!(u16)),
        )
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("FILE")
                .help("Configuration file path")
                .long_help(
                    "Path to a TOML, YAML or JSON configuration file. Values are merged
with environment variables.
Environment variable: LABELHOOKS_CONFIG_FILE",
                )
                .value_hint(ValueHint::FilePath)
                .value_parser(clap::value_parser!(PathBuf)),
        )
        .arg(
            Arg::new("max_request_size")
                .long("max-request-size")
                .value_name("BYTES")
                .help("Maximum request body size in bytes")
                .value_parser(clap::value_parser!(usize)),
        )
        .arg(
            Arg::new("base_url")
                .long("base-url")
                .value_name("URL")
                .help("Public origin used in resource hyperlinks")
                .value_hint(ValueHint::Url),
        )
        .arg(
            Arg::new("log_level")
                .short('l')
                .long("log-level")
                .value_name("LEVEL")
                .help("Log filter directive (e.g. debug, labelhooks=trace)"),
        )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_arguments() {
        let args = CliArgs::try_parse_from([
            "labelhooks-server",
            "--port",
            "8080",
            "--config",
            "labelhooks.toml",
            "--log-level",
            "debug",
        ])
        .unwrap();

        assert_eq!(args.port, Some(8080));
        assert_eq!(args.config_file, Some(PathBuf::from("labelhooks.toml")));
        assert_eq!(args.log_level.as_deref(), Some("debug"));
        assert!(args.host.is_none());
    }

    #[test]
    fn test_rejects_bad_port() {
        assert!(CliArgs::try_parse_from(["labelhooks-server", "--port", "http"]).is_err());
    }
}
