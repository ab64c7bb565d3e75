use crate::cli::{Args, ColorChoice};

pub struct AppConfig {
    pub color_enabled: bool,
    pub verbose: bool,
}

impl AppConfig {
    pub fn from_args(args: &Args) -> Self {
        let color_enabled = match args.color {
            ColorChoice::Always => true,
            ColorChoice::Never => false,
            ColorChoice::Auto => atty::is(atty::Stream::Stderr) && atty::is(atty::Stream::Stdout),
        };

        AppConfig {
            color_enabled,
            verbose: args.verbose,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_explicit_color_choice_wins() {
        let args = Args::parse_from(["monkey", "--color", "always", "-v"]);
        let config = AppConfig::from_args(&args);
        assert!(config.color_enabled);
        assert!(config.verbose);

        let args = Args::parse_from(["monkey", "--color", "never"]);
        assert!(!AppConfig::from_args(&args).color_enabled);
    }
}
