//! CREATE2 Factory Deployer CLI
//!
//! Usage:
//!   create2 salt --salt hello                          # 32-byte form of a salt
//!   create2 address --salt 1234 --integer -b 0x6080... # predicted address
//!   create2 address --salt hello -b @Account.bin -a address=0x303d...
//!   create2 factory-address --deployer-key $KEY        # where a bootstrap lands

use std::process;

use clap::Parser;
use serde_json::json;
use tracing_subscriber::EnvFilter;

use create2_deployer::config::{Command, ConfigError};
use create2_deployer::deployer::prepare;
use create2_deployer::{assemble, create_address, Config, DeployRequest};

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = Config::parse();

    if let Err(e) = config.validate() {
        eprintln!("Configuration error: {}", e);
        process::exit(1);
    }

    if let Err(e) = run(&config) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn run(config: &Config) -> Result<(), ConfigError> {
    let context = config.context()?;

    match &config.command {
        Command::Salt(args) => {
            let salt = args.resolve()?;
            if config.json {
                print_json(json!({ "salt": salt.to_hex() }));
            } else {
                println!("{}", salt.to_hex());
            }
        }
        Command::InitCode(args) => {
            let init_code = assemble(&args.creation_code()?, &args.constructor_args()?)?;
            if config.json {
                print_json(json!({
                    "initCode": init_code.to_hex(),
                    "initCodeHash": format!("0x{}", hex::encode(init_code.hash())),
                }));
            } else {
                println!("{}", init_code.to_hex());
            }
        }
        Command::Address { salt, code } => {
            let request = DeployRequest::new(salt.resolve()?, code.creation_code()?)
                .with_args(code.constructor_args()?);
            let prepared = prepare(&context, &request)?;
            if config.json {
                print_json(json!({
                    "address": prepared.address,
                    "factory": context.factory_address,
                    "salt": format!("0x{}", hex::encode(prepared.salt)),
                    "initCodeHash": format!("0x{}", hex::encode(prepared.init_code.hash())),
                }));
            } else {
                println!("CREATE2 Address");
                println!("===============");
                println!("Address:        {}", prepared.address);
                println!("Checksum:       {}", prepared.address.to_checksum());
                println!("Factory:        {}", context.factory_address);
                println!("Salt:           0x{}", hex::encode(prepared.salt));
                println!("Init code hash: 0x{}", hex::encode(prepared.init_code.hash()));
            }
        }
        Command::FactoryAddress { .. } => {
            let deployer = config.bootstrap_deployer()?;
            let factory = create_address(&deployer, 0);
            let matches = factory == context.factory_address;
            if config.json {
                print_json(json!({
                    "deployer": deployer,
                    "factory": factory,
                    "matchesConfigured": matches,
                }));
            } else {
                println!("Deployer: {}", deployer.to_checksum());
                println!("Factory:  {}", factory);
                if !matches {
                    println!(
                        "Warning:  differs from configured factory {}",
                        context.factory_address
                    );
                }
            }
        }
    }

    Ok(())
}

fn print_json(value: serde_json::Value) {
    println!("{value:#}");
}
