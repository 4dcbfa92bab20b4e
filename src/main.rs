mod app;
mod cli;
mod error;
mod logging;
mod model;
mod operations;
mod storage;

use std::io::{self, Write};

use clap::Parser;
use tracing::debug;

use app::App;
use cli::{Cli, Commands};
use storage::config::Config;

fn main() {
    // 解析命令行参数
    let cli = Cli::parse();
    logging::init(cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> error::Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();

    // config 不需要加载数据文件
    if let Some(Commands::Config { init }) = cli.command {
        return cli::run::show_config(&mut out, init);
    }

    let config = storage::config::load_config();
    run_with_config(cli, &config, &mut out)
}

/// 加载数据 → 执行命令 → 保存
///
/// 一次性命令只要有改动就保存（`--no-save` 除外），不受 `storage.autosave`
/// 影响；菜单退出时自行按 autosave 处理。
fn run_with_config<W: Write>(cli: Cli, config: &Config, out: &mut W) -> error::Result<()> {
    // 无子命令：进入交互式菜单
    let command = cli.command.unwrap_or(Commands::Menu);
    let data_path = cli.data.unwrap_or_else(|| config.data_path());
    let mut app = App::load(data_path, config)?;
    if cli.no_save {
        app.set_autosave(false);
    }
    debug!(
        path = %app.data_path().display(),
        autosave = app.autosave(),
        "data loaded"
    );

    let saved_project = app.workspace.current_name().to_string();
    if let Some(project) = cli.project.as_deref() {
        app.workspace.switch(project)?;
    }

    let interactive = matches!(command, Commands::Menu);
    cli::run::execute(&mut app, command, out)?;
    if interactive {
        return Ok(());
    }

    // --project 只作用于本次命令，保存的当前项目保持不变
    app.workspace.switch(&saved_project)?;
    if !cli.no_save && app.is_dirty() {
        app.save()?;
    }
    Ok(())
}
