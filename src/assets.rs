//! 内置站点资源：
//! - `site/` 目录在编译期整体嵌入
//! - 首页是 tera 模板，启动时渲染一次；样式与脚本原样输出

use anyhow::{Context, Result};
use include_dir::{include_dir, Dir};
use tera::{Context as TContext, Tera};

use crate::config::SiteSettings;

static SITE_DIR: Dir = include_dir!("$CARGO_MANIFEST_DIR/site");

pub(crate) const INDEX_TEMPLATE: &str = "index.html";
pub(crate) const STYLE_FILE: &str = "assets/css/style.css";
pub(crate) const SCRIPT_FILE: &str = "assets/js/script.js";

/// 渲染完成的三份文本资源，进程内不再变化
#[derive(Debug, Clone)]
pub(crate) struct SiteAssets {
    pub(crate) html: String,
    pub(crate) css: &'static str,
    pub(crate) js: &'static str,
}

impl SiteAssets {
    pub(crate) fn load(site: &SiteSettings) -> Result<Self> {
        let template = embedded_text(INDEX_TEMPLATE)?;
        Ok(Self {
            html: render_index(template, site)?,
            css: embedded_text(STYLE_FILE)?,
            js: embedded_text(SCRIPT_FILE)?,
        })
    }
}

fn embedded_text(path: &str) -> Result<&'static str> {
    SITE_DIR
        .get_file(path)
        .and_then(|f| f.contents_utf8())
        .with_context(|| format!("内置资源缺失或不是 UTF-8: {}", path))
}

fn render_index(template: &str, site: &SiteSettings) -> Result<String> {
    let mut ctx = TContext::new();
    ctx.insert("title", &site.title);
    ctx.insert("one_liner", &site.one_liner());
    Tera::one_off(template, &ctx, true).with_context(|| format!("渲染首页模板失败: {}", INDEX_TEMPLATE))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn index_is_rendered_with_site_settings() {
        let site = SiteSettings { title: "Demo <Site>".into(), base_url: "https://example.com".into() };
        let assets = SiteAssets::load(&site).unwrap();
        assert!(assets.html.contains("Demo &lt;Site&gt;"));
        assert!(assets.html.contains("bash &lt;(curl -fsSL https:&#x2F;&#x2F;example.com&#x2F;install)"), "{}", assets.html);
        assert!(!assets.html.contains("{{"));
        assert!(assets.html.contains("/assets/css/style.css"));
        assert!(assets.html.contains("/assets/js/script.js"));
    }

    #[test]
    fn style_and_script_are_embedded_verbatim() {
        let assets = SiteAssets::load(&SiteSettings::default()).unwrap();
        assert!(assets.css.contains(".notification"));
        assert!(assets.js.contains("navigator.clipboard.writeText"));
    }

    #[test]
    fn page_script_follows_notification_policy() {
        let js = SiteAssets::load(&SiteSettings::default()).unwrap().js;
        // 通知互不合并：新通知不会关掉旧的
        assert!(!js.contains("currentNotification"));
        assert!(!js.contains("dismiss()"));
        // 与 Notifier 相同的三个时间点
        for t in [", 100);", "}, 2000);", "}, 300);"] {
            assert!(js.contains(t), "missing timer {}", t);
        }
        // 简单按钮两级都失败时弹阻塞提示
        let failure = crate::notification::NotificationKind::Failure.message();
        assert!(js.contains(&format!("alert('{}')", failure)));
    }
}
