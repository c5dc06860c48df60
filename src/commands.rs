//! 命令调度模块：
//! - 接收解析好的 CLI 参数，计算“有效参数”（CLI > 环境变量 > 配置文件 > 内置默认）
//! - 调用配置加载、路由构建、服务、导出、命令生成等模块

use anyhow::Result;
use std::{io, path::PathBuf, thread, time::Duration};
use tracing::debug;

use crate::{
    assets::SiteAssets,
    cli::{Cli, Command, VariantArg},
    clipboard::{CopyOutcome, PrimaryClipboard, ScratchDocument, SystemClipboard, TerminalDocument},
    composer::Composer,
    config::{self, describe_source, validate_install_url, Config, DEFAULT_INSTALL_URL, DEFAULT_SCRIPT_NAME},
    export::export_site,
    notification::{NotificationState, DESTROY_DELAY_MS, HIDE_AFTER_MS},
    router::{Route, Router},
    serve::serve,
    session::{Session, Variant, COPIED_STATE_MS},
    utils::{env_bool_truthy, env_opt_path, env_opt_string, selection_from_path},
};

const DEFAULT_ADDR: &str = "127.0.0.1:8787";

/// 运行指定的子命令
pub(crate) fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Serve { addr, config, install_url, open } => {
            let effective_addr = addr
                .or(env_opt_string("INSTALLFLOW_ADDR"))
                .unwrap_or_else(|| DEFAULT_ADDR.to_string());
            let effective_open = if open { true } else { env_bool_truthy("INSTALLFLOW_OPEN").unwrap_or(false) };
            let cfg = load(config)?;
            let router = build_router(&cfg, install_url)?;
            serve(&router, &effective_addr, effective_open)
        }
        Command::Export { dir, force, config, install_url } => {
            let cfg = load(config)?;
            let router = build_router(&cfg, install_url)?;
            let written = export_site(&router, &dir, force)?;
            println!("✅ 导出完成，共写入 {} 个文件: {}", written.len(), dir.display());
            Ok(())
        }
        Command::Routes { config, install_url } => {
            let cfg = load(config)?;
            let router = build_router(&cfg, install_url)?;
            for (path, route) in router.entries() {
                println!("{:<24} {}", path, describe_route(route));
            }
            println!("{:<24} {}", "*", describe_route(router.fallback()));
            Ok(())
        }
        Command::Compose { path, config, html, copy, variant } => {
            let cfg = load(config)?;
            let composer = Composer::new(cfg.script_name.as_deref().unwrap_or(DEFAULT_SCRIPT_NAME));
            let event = selection_from_path(&path)?;
            let variant = match variant {
                VariantArg::Simple => Variant::Simple,
                VariantArg::DragDrop => Variant::DragDrop,
            };
            let mut session = Session::new(variant, composer, SystemClipboard::default(), TerminalDocument::new(io::stdout()));
            if !session.on_select(&event) {
                eprintln!("⚠️ 无法从 {} 推导文件夹：顶层文件没有所在目录", path.display());
                return Ok(());
            }
            if let Some(command) = session.install_command() {
                println!("{}", command);
            }
            if html {
                println!("{}", session.display().html);
            }
            if copy {
                compose_copy(&mut session);
            }
            Ok(())
        }
    }
}

fn compose_copy<C: PrimaryClipboard, D: ScratchDocument>(session: &mut Session<C, D>) {
    let outcome = session.on_copy_requested();
    for n in session.notifier().all() {
        println!("{}", n.message);
    }
    for alert in session.alerts() {
        eprintln!("{}", alert);
    }
    if outcome == Some(CopyOutcome::SucceededViaFallback) {
        println!("ℹ️ 系统剪贴板不可用，已通过终端 OSC 52 复制");
    }
    // X11 上退出即失去剪贴板内容，在“已复制”时长内保持句柄，让剪贴板管理器接手
    if cfg!(target_os = "linux") && outcome == Some(CopyOutcome::Succeeded) {
        debug!(hold_ms = COPIED_STATE_MS, "holding clipboard before exit");
        thread::sleep(Duration::from_millis(COPIED_STATE_MS));
    }
    // 退出前让按钮与通知走完生命周期
    session.advance_by(HIDE_AFTER_MS.max(COPIED_STATE_MS) + DESTROY_DELAY_MS);
    for n in session.notifier().all() {
        debug!(
            kind = ?n.kind,
            visible_at = ?n.entered_at(NotificationState::Visible),
            destroyed_at = ?n.entered_at(NotificationState::Destroyed),
            "notification settled"
        );
    }
    debug!(button = %session.button().label, live = session.notifier().live().count(), "session settled");
}

fn load(config: Option<PathBuf>) -> Result<Config> {
    let effective_config = config.or(env_opt_path("INSTALLFLOW_CONFIG"));
    let loaded = config::load_config(effective_config.as_deref())?;
    println!("ℹ️ 本次使用的配置来源: {}", describe_source(&loaded.source));
    Ok(loaded.config)
}

fn build_router(cfg: &Config, install_url: Option<String>) -> Result<Router> {
    let raw = install_url
        .or(env_opt_string("INSTALLFLOW_INSTALL_URL"))
        .or_else(|| cfg.install_url.clone())
        .unwrap_or_else(|| DEFAULT_INSTALL_URL.to_string());
    let target = validate_install_url(&raw)?;
    let assets = SiteAssets::load(&cfg.site)?;
    Ok(Router::new(target, assets))
}

fn describe_route(route: &Route) -> String {
    match route {
        Route::Redirect { target, status } => format!("{} -> {}", status, target),
        Route::StaticAsset(a) | Route::Fallback(a) => {
            format!("200 {} ({})", a.content_type, a.cache_control())
        }
    }
}
