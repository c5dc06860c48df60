//! 导出静态站点模块
//! - 把路由表写成目录，供 Cloudflare Pages 等边缘静态托管直接发布
//! - `/install` 写入 `_redirects`，缓存时长写入 `_headers`
//! - 未命中路径回退首页依赖 Pages 的默认行为（目录中不放 404.html）；
//!   `/*` 规则给这些路径带上首页的缓存时长，静态资源用 `! Cache-Control` 摘掉它再设置自己的

use anyhow::{bail, Context, Result};
use std::{fs, path::{Path, PathBuf}};

use crate::router::{Asset, Route, Router};

const INDEX_FILE: &str = "index.html";

/// 将路由表导出到 `dir`，返回实际写入的文件
pub(crate) fn export_site(router: &Router, dir: &Path, force: bool) -> Result<Vec<PathBuf>> {
    if !dir.exists() {
        fs::create_dir_all(dir).with_context(|| format!("创建目录失败: {}", dir.display()))?;
    }

    let mut files: Vec<(PathBuf, String)> = Vec::new();
    let mut redirects = String::new();
    let mut headers = String::new();

    let (Route::Fallback(page) | Route::StaticAsset(page)) = router.fallback() else {
        bail!("回退路由必须是文档");
    };
    files.push((dir.join(INDEX_FILE), page.body.clone()));
    headers.push_str(&format!("/*\n  Cache-Control: {}\n", page.cache_control()));
    // 首页的缓存时长同样来自 `/*`
    for p in ["/", "/index.html"] {
        headers.push_str(&format!("{}\n  Content-Type: {}\n", p, page.content_type));
    }

    for (path, route) in router.entries() {
        match route {
            Route::Redirect { target, status } => {
                redirects.push_str(&format!("{} {} {}\n", path, target, status));
            }
            Route::StaticAsset(asset) => {
                files.push((dir.join(path.trim_start_matches('/')), asset.body.clone()));
                push_asset_headers(&mut headers, path, asset);
            }
            Route::Fallback(_) => {}
        }
    }
    files.push((dir.join("_redirects"), redirects));
    files.push((dir.join("_headers"), headers));

    let mut written = Vec::new();
    for (target, body) in files {
        if target.exists() && !force {
            eprintln!("跳过: {} 已存在，使用 --force 可覆盖", target.display());
            continue;
        }
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&target, body.as_bytes()).with_context(|| format!("写出文件失败: {}", target.display()))?;
        println!("写入: {}", target.display());
        written.push(target);
    }
    Ok(written)
}

fn push_asset_headers(out: &mut String, path: &str, asset: &Asset) {
    out.push_str(&format!(
        "{}\n  Content-Type: {}\n  ! Cache-Control\n  Cache-Control: {}\n",
        path,
        asset.content_type,
        asset.cache_control()
    ));
}
