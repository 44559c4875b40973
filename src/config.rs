//! Command-line configuration for the `create2` tool.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::bytecode::{decode_hex, ConstructorArgs};
use crate::context::{FactoryContext, DEPLOYER_ADDRESS};
use crate::crypto::{Address, LocalSigner};
use crate::salt::Salt;

/// CREATE2 Factory Deployer
///
/// Predicts the addresses contracts get when deployed through the CREATE2
/// factory, and inspects the factory's own bootstrap.
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Config {
    /// Factory address (20 bytes hex); defaults to the well-known factory
    #[arg(long, global = true, env = "CREATE2_FACTORY")]
    pub factory: Option<String>,

    /// Print JSON instead of text
    #[arg(long, global = true, default_value = "false")]
    pub json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Normalize a salt to its 32-byte form
    Salt(SaltArgs),

    /// Assemble init code from creation bytecode and constructor arguments
    InitCode(CodeArgs),

    /// Predict where a deployment through the factory will land
    Address {
        #[command(flatten)]
        salt: SaltArgs,
        #[command(flatten)]
        code: CodeArgs,
    },

    /// Show the address a bootstrap account creates the factory at
    FactoryAddress {
        /// Bootstrap account address; defaults to the well-known deployer
        #[arg(long, conflicts_with = "deployer_key")]
        deployer: Option<String>,

        /// Bootstrap account secret key (32 bytes hex)
        #[arg(long, env = "CREATE2_DEPLOYER_KEY", hide_env_values = true)]
        deployer_key: Option<String>,
    },
}

#[derive(Args, Debug, Clone)]
pub struct SaltArgs {
    /// Salt: a hex literal of up to 32 bytes, or any other string (hashed)
    #[arg(long, required_unless_present = "random", allow_hyphen_values = true)]
    pub salt: Option<String>,

    /// Read --salt as a non-negative decimal integer
    #[arg(long, requires = "salt")]
    pub integer: bool,

    /// Use a fresh random salt
    #[arg(long, conflicts_with = "salt")]
    pub random: bool,
}

#[derive(Args, Debug, Clone)]
pub struct CodeArgs {
    /// Creation bytecode as hex, or @path to a file holding it
    #[arg(short, long)]
    pub bytecode: String,

    /// Constructor argument as TYPE=VALUE, in declaration order (repeatable)
    #[arg(short = 'a', long = "arg", value_name = "TYPE=VALUE")]
    pub args: Vec<String>,
}

impl Config {
    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.context()?;
        match &self.command {
            Command::Salt(salt) => salt.resolve().map(|_| ()),
            Command::InitCode(code) => code.validate(),
            Command::Address { salt, code } => {
                salt.resolve()?;
                code.validate()
            }
            Command::FactoryAddress { .. } => self.bootstrap_deployer().map(|_| ()),
        }
    }

    /// The factory context, with `--factory` substituted when given.
    pub fn context(&self) -> Result<FactoryContext, ConfigError> {
        let context = FactoryContext::default();
        match &self.factory {
            Some(factory) => Ok(context.with_factory_address(parse_address("factory", factory)?)),
            None => Ok(context),
        }
    }

    /// The bootstrap account for `factory-address`.
    pub fn bootstrap_deployer(&self) -> Result<Address, ConfigError> {
        match &self.command {
            Command::FactoryAddress {
                deployer_key: Some(key),
                ..
            } => Ok(LocalSigner::from_hex(key)?.address()),
            Command::FactoryAddress {
                deployer: Some(deployer),
                ..
            } => parse_address("deployer", deployer),
            _ => Ok(DEPLOYER_ADDRESS),
        }
    }
}

impl SaltArgs {
    pub fn resolve(&self) -> Result<Salt, ConfigError> {
        match (&self.salt, self.random) {
            (_, true) => Ok(Salt::random()),
            (Some(salt), false) if self.integer => Ok(Salt::from_decimal(salt)?),
            (Some(salt), false) => Ok(Salt::from_text(salt)?),
            (None, false) => Err(ConfigError::InvalidConfig(
                "either --salt or --random is required".into(),
            )),
        }
    }
}

impl CodeArgs {
    fn validate(&self) -> Result<(), ConfigError> {
        if let Some(path) = self.bytecode.strip_prefix('@') {
            if path.is_empty() {
                return Err(ConfigError::InvalidConfig("bytecode file path is empty".into()));
            }
        } else {
            decode_hex(&self.bytecode, "bytecode")?;
        }
        self.constructor_args().map(|_| ())
    }

    /// Creation bytecode, reading the file for `@path`.
    pub fn creation_code(&self) -> Result<Vec<u8>, ConfigError> {
        let hex = match self.bytecode.strip_prefix('@') {
            Some(path) => {
                let path = PathBuf::from(path);
                std::fs::read_to_string(&path).map_err(|source| ConfigError::Io { path, source })?
            }
            None => self.bytecode.clone(),
        };
        Ok(decode_hex(&hex, "bytecode")?)
    }

    pub fn constructor_args(&self) -> Result<ConstructorArgs, ConfigError> {
        let mut args = ConstructorArgs::new();
        for arg in &self.args {
            let (ty, value) = arg.split_once('=').ok_or_else(|| {
                ConfigError::InvalidConfig(format!("constructor argument {arg:?} is not TYPE=VALUE"))
            })?;
            args = args.parse(ty.trim(), value)?;
        }
        Ok(args)
    }
}

fn parse_address(what: &str, value: &str) -> Result<Address, ConfigError> {
    value
        .parse()
        .map_err(|e| ConfigError::InvalidConfig(format!("{what} must be a 20-byte hex address: {e}")))
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid config: {0}")]
    InvalidConfig(String),
    #[error("Cannot read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error(transparent)]
    Deploy(#[from] crate::error::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    const CODE: &str = "0x6080604052";
    const OWNER: &str = "0x303de46de694cc75a2f66da93ac86c6a6eee607e";

    fn parse(args: &[&str]) -> Config {
        Config::try_parse_from(std::iter::once("create2").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_address_command() {
        let config = parse(&[
            "address",
            "--salt",
            "hello",
            "--bytecode",
            CODE,
            "--arg",
            &format!("address={OWNER}"),
        ]);
        config.validate().unwrap();
        let Command::Address { salt, code } = &config.command else {
            panic!("expected address command");
        };
        assert_eq!(salt.resolve().unwrap(), Salt::from("hello"));
        assert_eq!(code.creation_code().unwrap(), vec![0x60, 0x80, 0x60, 0x40, 0x52]);
        assert_eq!(code.constructor_args().unwrap().len(), 1);
    }

    #[test]
    fn test_integer_salt_flag() {
        let config = parse(&["salt", "--salt", "1234", "--integer"]);
        let Command::Salt(salt) = &config.command else {
            panic!("expected salt command");
        };
        assert_eq!(salt.resolve().unwrap(), Salt::from(1234u64));

        let config = parse(&["salt", "--salt", "-1", "--integer"]);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_salt_or_random_required() {
        assert!(Config::try_parse_from(["create2", "salt"]).is_err());
        assert!(Config::try_parse_from(["create2", "salt", "--salt", "a", "--random"]).is_err());
        parse(&["salt", "--random"]).validate().unwrap();
    }

    #[test]
    fn test_factory_override() {
        let config = parse(&["--factory", OWNER, "salt", "--salt", "x"]);
        assert_eq!(
            config.context().unwrap().factory_address,
            OWNER.parse::<Address>().unwrap()
        );

        let config = parse(&["--factory", "0x1234", "salt", "--salt", "x"]);
        assert!(matches!(config.validate(), Err(ConfigError::InvalidConfig(_))));
    }

    #[test]
    fn test_bad_constructor_args() {
        let config = parse(&["init-code", "--bytecode", CODE, "--arg", "address"]);
        assert!(matches!(config.validate(), Err(ConfigError::InvalidConfig(_))));

        let config = parse(&["init-code", "--bytecode", CODE, "--arg", "bool=maybe"]);
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Deploy(crate::error::Error::Encoding(_)))
        ));
    }

    #[test]
    fn test_bytecode_file() {
        let path = std::env::temp_dir().join(format!("create2-config-{}.hex", std::process::id()));
        std::fs::write(&path, format!("{CODE}\n")).unwrap();
        let config = parse(&["init-code", "--bytecode", &format!("@{}", path.display())]);
        let Command::InitCode(code) = &config.command else {
            panic!("expected init-code command");
        };
        assert_eq!(code.creation_code().unwrap().len(), 5);
        std::fs::remove_file(&path).unwrap();

        assert!(matches!(code.creation_code(), Err(ConfigError::Io { .. })));
    }

    #[test]
    fn test_bootstrap_deployer() {
        let config = parse(&["factory-address"]);
        assert_eq!(config.bootstrap_deployer().unwrap(), DEPLOYER_ADDRESS);

        let config = parse(&[
            "factory-address",
            "--deployer-key",
            "0x0000000000000000000000000000000000000000000000000000000000000001",
        ]);
        assert_eq!(
            config.bootstrap_deployer().unwrap().to_hex(),
            "7e5f4552091a69125d5dfcb7b8c2659029395bdf"
        );
    }
}
