mod api;
mod board;
mod cli;
mod error;
mod items;
mod logging;
mod secrets;
mod storage;
mod validation;

use anyhow::{Context, Result};
use clap::Parser;

use cli::{Cli, Commands};

fn main() -> Result<()> {
    // 解析命令行参数
    let cli = Cli::parse();

    let cwd = std::env::current_dir().context("failed to read current directory")?;
    let dotenv = secrets::load_dotenv(&cwd);

    let config = storage::config::load_config();
    logging::init_logging(&config.log.level);
    dotenv.log();

    // 无子命令：启动 Web 服务
    let command = cli.command.unwrap_or(Commands::Web {
        host: None,
        port: None,
        no_open: false,
    });

    // 统一调度
    match command {
        Commands::Web {
            host,
            port,
            no_open,
        } => {
            let secrets = secrets::Secrets::from_env();
            tokio::runtime::Runtime::new()
                .context("failed to create tokio runtime")?
                .block_on(cli::web::execute(&config, &secrets, host, port, no_open))?;
        }
        Commands::Setup { dir } => {
            std::process::exit(cli::setup::execute(&dir));
        }
        Commands::Tasks { action } => {
            cli::tasks::execute(&config, action)?;
        }
        Commands::Board => {
            cli::tasks::print_board(&config)?;
        }
    }

    Ok(())
}
