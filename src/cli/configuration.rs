use {
    clap::ArgMatches,
    serde::Deserialize,
    std::{error, fmt, fs::File, io::Read, path::Path},
};

pub const DEFAULT_GRAMMAR: &str = "expr";

/// Settings read from a YAML configuration file. Every key is optional.
#[derive(Debug, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Configuration {
    pub grammar: String,
    pub start: Option<String>,
    pub logfile: Option<String>,
    pub loglevel: Option<String>,
    pub pretty: bool,
}

impl Default for Configuration {
    fn default() -> Self {
        Configuration {
            grammar: String::from(DEFAULT_GRAMMAR),
            start: None,
            logfile: None,
            loglevel: None,
            pretty: false,
        }
    }
}

impl Configuration {
    /// Overrides settings with any that were given on the command line.
    pub fn apply_matches(&mut self, matches: &ArgMatches) {
        if let Some(grammar) = matches.value_of("grammar") {
            self.grammar = String::from(grammar);
        }
        if let Some(start) = matches.value_of("start") {
            self.start = Some(String::from(start));
        }
        if let Some(logfile) = matches.value_of("logfile") {
            self.logfile = Some(String::from(logfile));
        }
        if let Some(loglevel) = matches.value_of("loglevel") {
            self.loglevel = Some(String::from(loglevel));
        }
        if matches.is_present("pretty") {
            self.pretty = true;
        }
    }
}

pub fn read_configuration(path: &Path) -> Result<Configuration, ConfigurationError> {
    let mut conf_str = String::new();

    match File::open(path) {
        Ok(mut file) => {
            if let Err(err) = file.read_to_string(&mut conf_str) {
                return Err(ConfigurationError::IOErr(format!(
                    "Could not read configuration file \"{}\": {}",
                    path.display(),
                    err
                )));
            }
        }
        Err(err) => {
            return Err(ConfigurationError::IOErr(format!(
                "Could not find configuration file \"{}\": {}",
                path.display(),
                err
            )));
        }
    }

    parse_configuration(&conf_str)
}

pub fn parse_configuration(conf_str: &str) -> Result<Configuration, ConfigurationError> {
    Ok(serde_yaml::from_str(conf_str)?)
}

#[derive(Debug)]
pub enum ConfigurationError {
    IOErr(String),
    DeserializationErr(serde_yaml::Error),
}

impl fmt::Display for ConfigurationError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            ConfigurationError::IOErr(ref err) => write!(f, "IO Error: {}", err),
            ConfigurationError::DeserializationErr(ref err) => {
                write!(f, "Failed to parse configuration file: {}", err)
            }
        }
    }
}

impl error::Error for ConfigurationError {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match *self {
            ConfigurationError::IOErr(_) => None,
            ConfigurationError::DeserializationErr(ref err) => Some(err),
        }
    }
}

impl From<serde_yaml::Error> for ConfigurationError {
    fn from(err: serde_yaml::Error) -> Self {
        ConfigurationError::DeserializationErr(err)
    }
}
