//! 配置与加载模块：
//! - 定义 `Config`/`SiteSettings` 数据结构（全部字段可选，缺省即内置默认值）
//! - 提供 `load_config` 支持显式路径与当前目录自动发现
//! - 暴露配置来源信息，便于日志打印

use std::{fs, path::{Path, PathBuf}};
use anyhow::{bail, Context, Result};
use serde::Deserialize;
use url::Url;

/// `/install` 默认跳转的远程安装脚本
pub(crate) const DEFAULT_INSTALL_URL: &str =
    "https://gh.ahua.space/https://raw.githubusercontent.com/Ahua9527/installflow/main/Scripts/install.sh";
pub(crate) const DEFAULT_BASE_URL: &str = "https://ding.ahua.space";
pub(crate) const DEFAULT_TITLE: &str = "叮当装 InstallFlow";
pub(crate) const DEFAULT_SCRIPT_NAME: &str = "bootstrap.sh";

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct Config {
    #[serde(default)]
    pub(crate) site: SiteSettings,
    /// `/install` 的跳转目标（http/https 绝对地址）
    #[serde(default)]
    pub(crate) install_url: Option<String>,
    /// 本地安装命令调用的脚本名，默认 bootstrap.sh
    #[serde(default)]
    pub(crate) script_name: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct SiteSettings {
    #[serde(default = "default_title")]
    pub(crate) title: String,
    /// 页面上展示的 `curl` 一行命令所用的站点地址，末尾可不带 `/`
    #[serde(default = "default_base_url")]
    pub(crate) base_url: String,
}

impl Default for SiteSettings {
    fn default() -> Self {
        Self { title: default_title(), base_url: default_base_url() }
    }
}

fn default_title() -> String { DEFAULT_TITLE.to_string() }
fn default_base_url() -> String { DEFAULT_BASE_URL.to_string() }

impl SiteSettings {
    /// 终端一行安装命令，例如 `bash <(curl -fsSL https://ding.ahua.space/install)`
    pub(crate) fn one_liner(&self) -> String {
        format!("bash <(curl -fsSL {}/install)", self.base_url.trim_end_matches('/'))
    }
}

/// 配置来源
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum ConfigSource {
    LocalExplicit(String),
    LocalAuto(String),
    Builtin,
}

/// 加载后的配置及其来源
#[derive(Debug)]
pub(crate) struct LoadedConfig { pub(crate) config: Config, pub(crate) source: ConfigSource }

/// 人类可读的来源描述
pub(crate) fn describe_source(src: &ConfigSource) -> String {
    match src {
        ConfigSource::LocalExplicit(p) => format!("本地文件: {}", p),
        ConfigSource::LocalAuto(p) => format!("本地文件(自动发现): {}", p),
        ConfigSource::Builtin => "内置默认值".to_string(),
    }
}

// 自动发现本地配置：installflow.yaml / installflow.yml
fn resolve_local_config_path(dir: &Path) -> Option<PathBuf> {
    ["installflow.yaml", "installflow.yml"]
        .iter()
        .map(|cand| dir.join(cand))
        .find(|p| p.is_file())
}

/// 加载配置：显式路径 > 当前目录自动发现 > 内置默认值。
/// 显式路径不存在视为错误，自动发现找不到则静默回退。
pub(crate) fn load_config(explicit: Option<&Path>) -> Result<LoadedConfig> {
    if let Some(path) = explicit {
        if !path.is_file() { bail!("配置文件不存在: {}", path.display()); }
        let config = read_config(path)?;
        return Ok(LoadedConfig { config, source: ConfigSource::LocalExplicit(path.display().to_string()) });
    }
    if let Some(path) = resolve_local_config_path(Path::new(".")) {
        let config = read_config(&path)?;
        return Ok(LoadedConfig { config, source: ConfigSource::LocalAuto(path.display().to_string()) });
    }
    Ok(LoadedConfig { config: Config::default(), source: ConfigSource::Builtin })
}

fn read_config(path: &Path) -> Result<Config> {
    let text = fs::read_to_string(path).with_context(|| format!("读取配置失败: {}", path.display()))?;
    parse_config(&text).with_context(|| format!("解析 YAML 失败: {}", path.display()))
}

pub(crate) fn parse_config(text: &str) -> Result<Config> {
    // 空文件等价于全部默认
    if text.trim().is_empty() { return Ok(Config::default()); }
    let config: Config = serde_yaml::from_str(text)?;
    if let Some(u) = config.install_url.as_deref() { validate_install_url(u)?; }
    if let Some(s) = config.script_name.as_deref() { validate_script_name(s)?; }
    Ok(config)
}

/// 跳转目标必须是 http/https 绝对地址
pub(crate) fn validate_install_url(u: &str) -> Result<String> {
    let parsed = Url::parse(u).with_context(|| format!("install_url 不是合法 URL: {}", u))?;
    match parsed.scheme() {
        "http" | "https" => Ok(u.to_string()),
        other => bail!("install_url 仅支持 http/https，收到: {}", other),
    }
}

/// 脚本名直接拼进 shell 命令，限制为不含空白与引号的单个词
pub(crate) fn validate_script_name(s: &str) -> Result<()> {
    if s.is_empty() || s.chars().any(|c| c.is_whitespace() || matches!(c, '"' | '\'' | '\\' | '$' | '`' | ';' | '&' | '|')) {
        bail!("script_name 非法: {:?}", s);
    }
    Ok(())
}
