//! CLI 定义模块：仅负责命令行参数结构体与解析
//! 将 clap 的声明与业务逻辑解耦，便于在其它模块中复用参数。

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// 顶层 CLI 入口
#[derive(Parser, Debug)]
#[command(name = "installflow", about = "叮当装落地页：路由服务与安装命令生成", version)]
pub(crate) struct Cli {
    /// 输出调试日志（未设置 RUST_LOG 时生效）
    #[arg(long, global = true)]
    pub(crate) debug: bool,
    #[command(subcommand)]
    pub(crate) command: Command,
}

/// 页面形态
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum VariantArg {
    /// 复制按钮进入"已复制"状态，失败时弹窗提示
    Simple,
    /// 仅通过通知反馈结果
    DragDrop,
}

/// 子命令定义
#[derive(Subcommand, Debug)]
pub(crate) enum Command {
    /// 在本地启动路由服务
    Serve {
        /// 监听地址，默认 127.0.0.1:8787
        #[arg(long, value_name = "ADDR")]
        addr: Option<String>,
        /// 配置文件路径，默认自动发现 installflow.yaml / installflow.yml
        #[arg(short, long, value_name = "FILE")]
        config: Option<PathBuf>,
        /// 覆盖 /install 的跳转目标
        #[arg(long, value_name = "URL")]
        install_url: Option<String>,
        /// 启动后自动在浏览器打开
        #[arg(long)]
        open: bool,
    },
    /// 导出静态站点（含 _redirects / _headers），用于边缘静态托管
    Export {
        /// 目标目录
        #[arg(value_name = "DIR")]
        dir: PathBuf,
        /// 强制覆盖已存在文件
        #[arg(long)]
        force: bool,
        #[arg(short, long, value_name = "FILE")]
        config: Option<PathBuf>,
        #[arg(long, value_name = "URL")]
        install_url: Option<String>,
    },
    /// 根据本地目录或文件生成安装命令（路径相对于执行脚本的目录）
    Compose {
        /// 目录按拖入目录处理，文件按拖入单个文件处理
        #[arg(value_name = "PATH")]
        path: PathBuf,
        #[arg(short, long, value_name = "FILE")]
        config: Option<PathBuf>,
        /// 同时输出渲染后的 HTML 代码块
        #[arg(long)]
        html: bool,
        /// 复制到剪贴板（系统剪贴板失败时退回终端 OSC 52）
        #[arg(long)]
        copy: bool,
        /// 复制结果的反馈方式
        #[arg(long, value_enum, default_value_t = VariantArg::DragDrop)]
        variant: VariantArg,
    },
    /// 打印路由表
    Routes {
        #[arg(short, long, value_name = "FILE")]
        config: Option<PathBuf>,
        #[arg(long, value_name = "URL")]
        install_url: Option<String>,
    },
}
