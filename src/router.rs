//! 路由分发模块：
//! - 固定路由表在启动时构建一次，此后只读
//! - 按路径精确匹配（区分大小写、不处理末尾 `/`），未命中一律回退首页
//! - `dispatch` 是纯函数，不记录日志、不做 I/O

use crate::assets::SiteAssets;

pub(crate) const INSTALL_PATH: &str = "/install";
pub(crate) const STYLE_PATH: &str = "/assets/css/style.css";
pub(crate) const SCRIPT_PATH: &str = "/assets/js/script.js";

const ASSET_MAX_AGE: u32 = 86400;
const PAGE_MAX_AGE: u32 = 3600;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Asset {
    pub(crate) body: String,
    pub(crate) content_type: &'static str,
    pub(crate) cache_seconds: u32,
}

impl Asset {
    pub(crate) fn cache_control(&self) -> String {
        format!("public, max-age={}", self.cache_seconds)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Route {
    Redirect { target: String, status: u16 },
    StaticAsset(Asset),
    /// 未命中任何路径时返回的文档
    Fallback(Asset),
}

#[derive(Debug)]
pub(crate) struct Router {
    table: Vec<(&'static str, Route)>,
    fallback: Route,
}

impl Router {
    pub(crate) fn new(install_url: impl Into<String>, assets: SiteAssets) -> Self {
        let table = vec![
            (INSTALL_PATH, Route::Redirect { target: install_url.into(), status: 302 }),
            (STYLE_PATH, Route::StaticAsset(Asset {
                body: assets.css.to_string(),
                content_type: "text/css; charset=utf-8",
                cache_seconds: ASSET_MAX_AGE,
            })),
            (SCRIPT_PATH, Route::StaticAsset(Asset {
                body: assets.js.to_string(),
                content_type: "application/javascript; charset=utf-8",
                cache_seconds: ASSET_MAX_AGE,
            })),
        ];
        let fallback = Route::Fallback(Asset {
            body: assets.html,
            content_type: "text/html; charset=utf-8",
            cache_seconds: PAGE_MAX_AGE,
        });
        Self { table, fallback }
    }

    /// 对任意路径都返回唯一的路由
    pub(crate) fn dispatch(&self, path: &str) -> &Route {
        self.table
            .iter()
            .find(|(p, _)| *p == path)
            .map(|(_, r)| r)
            .unwrap_or(&self.fallback)
    }

    /// 显式路由（不含回退项）
    pub(crate) fn entries(&self) -> impl Iterator<Item = (&'static str, &Route)> {
        self.table.iter().map(|(p, r)| (*p, r))
    }

    pub(crate) fn fallback(&self) -> &Route {
        &self.fallback
    }
}

/// 从请求 URL 中取出路径部分（丢弃查询串与片段）
pub(crate) fn path_of(url: &str) -> &str {
    url.split(['?', '#']).next().unwrap_or("")
}
